//! # mailsift-core
//!
//! Core domain types for the `mailsift` search engine.
//!
//! This crate provides:
//! - **Mail records** - the immutable snapshot a search pass scans
//! - **Identities** - name/email resolution for senders and receivers
//! - **Record stores** - user-scoped candidate retrieval (in-memory and `SQLite`)
//! - **Engine configuration** - ranking policies loaded from disk

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod identity;
pub mod mail;
pub mod store;

pub use config::{EngineConfig, MissingRelationPolicy, TextMatchMode, TieBreak};
pub use error::{Error, Result};
pub use identity::{Directory, Identity, IdentityResolver, UserId};
pub use mail::{Attachment, AttachmentId, Mail, MailId, folders};
pub use store::{MailRepository, MemoryStore, RecordStore};
