//! Veil Resolve - Visibility, Permission and Reward Resolution
//!
//! Given a content snapshot, the snapshots it depends on (the targeted
//! subject and the root) and a viewer, this crate decides what the viewer may
//! see and do:
//!
//! - `secret`: whether secret material is hidden, and which entity owns it
//! - `permission`: edit, delete, close and reopen, fail-closed
//! - `reward`: reward ceiling, reward and recommend eligibility, and why a
//!   reward control is disabled
//! - `facade`: one `Resolution` per item, from snapshots or from a store
//! - `actions`: `ActionGate`, which refuses intents a resolution does not grant
//!   before they reach the external action layer
//!
//! All resolvers are pure functions of their inputs. Re-resolving after a
//! snapshot changes is the caller's job; see `ViewerSession::subscribe`.

pub mod actions;
pub mod facade;
pub mod ownership;
pub mod permission;
pub mod reward;
pub mod secret;

pub use actions::{check_intent, ActionGate, ActionIntent, ActionLayer, ContentPatch};
pub use facade::{Resolution, Resolver};
pub use ownership::{is_anonymous, is_owner, outranks};
pub use permission::{
    can_submit_comment, evaluate_close, evaluate_delete, evaluate_edit, resolve_close_permission,
    resolve_delete_permission, resolve_edit_permission, PermissionDecision,
};
pub use reward::{
    can_recommend, effective_reward_level, user_can_reward, validate_reward_level,
    xp_button_disabled_reason, RewardInterface, XpDisabledReason,
};
pub use secret::{can_request_reveal, resolve_secret_hidden, secret_owner, SecretOwner};
