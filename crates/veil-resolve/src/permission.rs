//! Edit, delete and close permissions
//!
//! Evaluation order mirrors the server: explicit denials first (tombstones,
//! anonymous viewers, unknown uploaders, moderator-locked types), then
//! ownership, then the moderator path (capability flag plus strictly higher
//! rank). Every path fails closed.

use veil_core::{ContentEntity, ContentType, DenialReason, EngineConfig, TargetObj, Viewer};

use crate::ownership::{is_owner, outranks};

/// Outcome of a permission evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    /// The viewer may perform the action
    Allow,
    /// The viewer may not perform the action
    Deny(DenialReason),
}

impl PermissionDecision {
    /// Whether the action is allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionDecision::Allow)
    }

    fn from_bool(allowed: bool, reason: DenialReason) -> Self {
        if allowed {
            PermissionDecision::Allow
        } else {
            PermissionDecision::Deny(reason)
        }
    }
}

/// Denials shared by every action
fn explicit_denial(item: &ContentEntity, viewer: &Viewer) -> Option<DenialReason> {
    if item.is_tombstoned() {
        return Some(DenialReason::TombstonedEntity);
    }
    // Unknown uploaders fail closed: nobody can claim to outrank them.
    if viewer.is_anonymous() || item.uploader.is_unknown() {
        return Some(DenialReason::Unauthorized);
    }
    None
}

/// Evaluate edit permission
///
/// `target` is the dependency set's target, the same one the secret walk
/// sees; the item's embedded fragment is used only when none is given.
pub fn evaluate_edit(
    item: &ContentEntity,
    target: Option<&TargetObj>,
    viewer: &Viewer,
    config: &EngineConfig,
) -> PermissionDecision {
    if let Some(reason) = explicit_denial(item, viewer) {
        return PermissionDecision::Deny(reason);
    }

    let owner = is_owner(viewer, &item.uploader);
    if !owner && config.is_moderator_locked(item.content_type) {
        return PermissionDecision::Deny(DenialReason::Unauthorized);
    }

    // A comment answering a secret subject stays with whoever wrote both.
    if item.content_type == ContentType::Comment {
        let subject = target
            .or(item.target_obj.as_ref())
            .and_then(|t| t.subject.as_ref());
        if let Some(subject) = subject.filter(|s| s.has_secret()) {
            return PermissionDecision::from_bool(
                owner && is_owner(viewer, &subject.uploader),
                DenialReason::Unauthorized,
            );
        }
    }

    PermissionDecision::from_bool(
        owner || (viewer.permissions.can_edit && outranks(viewer, &item.uploader)),
        DenialReason::Unauthorized,
    )
}

/// Evaluate delete permission
pub fn evaluate_delete(
    item: &ContentEntity,
    viewer: &Viewer,
    config: &EngineConfig,
) -> PermissionDecision {
    if let Some(reason) = explicit_denial(item, viewer) {
        return PermissionDecision::Deny(reason);
    }

    let owner = is_owner(viewer, &item.uploader);
    if !owner && config.is_moderator_locked(item.content_type) {
        return PermissionDecision::Deny(DenialReason::Unauthorized);
    }

    PermissionDecision::from_bool(
        owner || (viewer.permissions.can_delete && outranks(viewer, &item.uploader)),
        DenialReason::Unauthorized,
    )
}

/// Evaluate close (or, for a closed subject, reopen) permission
///
/// Reopening is gated on the closer: the closer can always reopen; a subject
/// closed by its own uploader stays closed for everyone else; the uploader
/// can reopen unless the closer out-levels them; a moderator must out-level
/// the closer.
pub fn evaluate_close(item: &ContentEntity, viewer: &Viewer) -> PermissionDecision {
    if item.content_type != ContentType::Subject {
        return PermissionDecision::Deny(DenialReason::InvalidTransition);
    }
    if let Some(reason) = explicit_denial(item, viewer) {
        return PermissionDecision::Deny(reason);
    }

    let owner = is_owner(viewer, &item.uploader);
    let moderator = viewer.permissions.can_delete && outranks(viewer, &item.uploader);

    let Some(closer) = &item.is_closed_by else {
        return PermissionDecision::from_bool(owner || moderator, DenialReason::Unauthorized);
    };

    if closer.id == viewer.id {
        return PermissionDecision::Allow;
    }
    if closer.id == item.uploader.id {
        return PermissionDecision::Deny(DenialReason::InvalidTransition);
    }
    if owner {
        return PermissionDecision::from_bool(
            closer.level <= viewer.level,
            DenialReason::InvalidTransition,
        );
    }
    if !moderator {
        return PermissionDecision::Deny(DenialReason::Unauthorized);
    }
    PermissionDecision::from_bool(viewer.level > closer.level, DenialReason::InvalidTransition)
}

fn logged(
    action: &'static str,
    item: &ContentEntity,
    viewer: &Viewer,
    decision: PermissionDecision,
) -> bool {
    if let PermissionDecision::Deny(reason) = decision {
        tracing::trace!(
            action,
            item = %item.key(),
            viewer = %viewer.id,
            %reason,
            "permission denied"
        );
    }
    decision.is_allowed()
}

/// Whether the viewer may edit the item
pub fn resolve_edit_permission(
    item: &ContentEntity,
    target: Option<&TargetObj>,
    viewer: &Viewer,
    config: &EngineConfig,
) -> bool {
    logged("edit", item, viewer, evaluate_edit(item, target, viewer, config))
}

/// Whether the viewer may delete the item
pub fn resolve_delete_permission(
    item: &ContentEntity,
    viewer: &Viewer,
    config: &EngineConfig,
) -> bool {
    logged("delete", item, viewer, evaluate_delete(item, viewer, config))
}

/// Whether the viewer may close (or reopen) the subject
pub fn resolve_close_permission(item: &ContentEntity, viewer: &Viewer) -> bool {
    logged("close", item, viewer, evaluate_close(item, viewer))
}

/// Whether new comments may be submitted under the subject
pub fn can_submit_comment(subject: &ContentEntity) -> bool {
    !subject.is_tombstoned() && !subject.is_closed()
}
