//! Veil Testing Infrastructure
//!
//! Builders for content snapshots and viewers, so tests describe only the
//! fields a scenario cares about.
//!
//! ```rust,no_run
//! use veil_testkit::*;
//!
//! let subject = EntityBuilder::subject(5)
//!     .uploader(4, 1)
//!     .secret_answer("42")
//!     .build();
//! let viewer = moderator(9, 3);
//! ```

pub mod builders;
pub mod logging;

pub use builders::{moderator, rewarder, subject_ref, viewer, EntityBuilder};
pub use logging::init_test_tracing;
