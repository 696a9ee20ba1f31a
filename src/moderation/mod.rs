//! Content moderation for reviews and comments.
//!
//! A submission goes through the local filter, up to two external
//! classifiers and a last heuristic pass. [`Moderator::moderate`] folds
//! their results into one [`ModerationVerdict`] and never fails.

pub mod additional;
pub mod audit;
pub mod classifiers;
pub mod filter;
pub mod lexicon;
pub mod orchestrator;
pub mod types;

pub use audit::{MemorySink, RejectionLogEntry, RejectionSink, TracingSink};
pub use classifiers::{Classifier, ClassifierError, ClassifierOutcome};
pub use filter::{FilterOutcome, screen};
pub use orchestrator::Moderator;
pub use types::{Category, ModerationRequest, ModerationVerdict};
