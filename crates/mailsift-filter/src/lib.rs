//! # mailsift-filter
//!
//! Filter-and-rank engine for mail search.
//!
//! A sparse [`QuerySpec`] is turned into one strategy per supplied criterion
//! by the [`FilterBuilder`]. The strategies are folded into a single
//! composite with soft-logic [`And`]/[`Or`] combinators, and the [`Ranker`]
//! keeps the records the composite matches, ordered by descending score.
//!
//! ```ignore
//! use std::sync::Arc;
//! use mailsift_filter::{CombineMode, FilterBuilder, QuerySpec, Ranker};
//!
//! let builder = FilterBuilder::new(Arc::new(directory), config);
//! let spec = QuerySpec::new().with_sender(["alice"]).with_priority(3);
//! let strategy = builder.build_and_fold(&spec, CombineMode::And)?;
//! let ranked = Ranker::new(config).rank(strategy.as_ref(), candidates)?;
//! ```
//!
//! Strategies are immutable values built per query. They are `Send + Sync`,
//! so a composite may be evaluated from any thread, but each search should
//! build its own.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod combinator;
mod error;
mod query;
mod rank;
mod score;
mod service;
pub mod strategy;
mod text;
mod view;

pub use combinator::{And, CombineMode, Or, fold};
pub use error::{FilterError, Relation, Result};
pub use query::{FilterBuilder, QuerySpec};
pub use rank::{Ranker, Scored};
pub use score::Score;
pub use service::SearchService;
pub use strategy::{BoxedStrategy, FilterStrategy};
pub use view::{AttachmentView, EmailView};
