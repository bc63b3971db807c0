//! Veil Core - Content Model and Viewer State
//!
//! This crate holds the data the visibility engine reasons about:
//!
//! - Snapshots: `ContentEntity` and the `SubjectRef` / `CommentRef` fragments
//!   a comment carries for its target
//! - Identity: `UserId`, `ContentId`, `ContentType`, `ContentKey`
//! - The acting user: `Viewer` and its capability flags
//! - Reveal state: `RevealFlag` / `RevealLedger`, always scoped to a viewer
//! - `ViewerSession`: viewer and reveal ledger swapped as one unit
//! - Boundaries: `EntityAccessor` and `ViewerSource` traits, plus an
//!   in-memory store
//! - `EngineConfig` and the unified `EngineError`
//!
//! # Architecture
//!
//! Data flows one way: the external entity store is read through
//! `EntityAccessor`, the resolvers in `veil-resolve` compute a per-item
//! resolution, and rendering consumes it. Nothing in this crate mutates an
//! entity in place; the store replaces snapshots wholesale.

pub mod accessor;
pub mod config;
pub mod content;
pub mod errors;
pub mod identifiers;
pub mod reveal;
pub mod session;
pub mod viewer;

pub use accessor::{EntityAccessor, InMemoryEntityStore, ViewerSource};
pub use config::EngineConfig;
pub use content::{
    Closer, CommentRef, ContentEntity, Recommendation, RewardRecord, SecretAttachment, SubjectRef,
    TargetObj, Uploader,
};
pub use errors::{DenialReason, EngineError, Result};
pub use identifiers::{ContentId, ContentKey, ContentType, UserId};
pub use reveal::{RevealFlag, RevealLedger};
pub use session::{SessionSnapshot, SessionSubscription, ViewerSession};
pub use viewer::{Viewer, ViewerPermissions};
