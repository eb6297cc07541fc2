//! User identities and email-to-identity resolution.
//!
//! Sender and receiver searches match against a person's name as well as
//! their address, so a mail's addresses are resolved through an
//! [`IdentityResolver`] at search time.

mod directory;
mod model;

pub use directory::{Directory, IdentityResolver};
pub use model::{Identity, UserId};
