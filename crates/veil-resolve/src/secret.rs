//! Secret visibility
//!
//! Secret material (a subject's hidden answer or attachment) is shown only to
//! the uploader of the entity that defines it, or to a viewer the server has
//! confirmed the secret for. The defining entity is found by walking the
//! chain nearest-first and stopping at the first entity that has a secret:
//!
//! 1. the item itself, when it is a subject
//! 2. the subject the item targets
//! 3. the item's root (secret answers only)
//!
//! The walk stops early on purpose: once a nearer subject is known, a
//! secret-bearing root further up says nothing about this item.

use veil_core::{ContentEntity, ContentKey, ContentType, RevealLedger, TargetObj, Uploader, Viewer};

use crate::ownership::is_owner;

/// Entity whose secret governs an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretOwner {
    /// Key of the secret-bearing entity
    pub key: ContentKey,
    /// Its uploader
    pub uploader: Uploader,
}

/// Find the entity whose secret applies to `item`
pub fn secret_owner(
    item: &ContentEntity,
    target: Option<&TargetObj>,
    root: Option<&ContentEntity>,
) -> Option<SecretOwner> {
    if item.content_type == ContentType::Subject && item.has_secret() {
        return Some(SecretOwner {
            key: item.key(),
            uploader: item.uploader,
        });
    }

    if let Some(subject) = target.and_then(|t| t.subject.as_ref()) {
        if subject.has_secret() {
            return Some(SecretOwner {
                key: subject.key(),
                uploader: subject.uploader,
            });
        }
    }

    root.filter(|r| r.has_secret_answer()).map(|r| SecretOwner {
        key: r.key(),
        uploader: r.uploader,
    })
}

/// Whether secret material must be hidden from the viewer
pub fn resolve_secret_hidden(
    item: &ContentEntity,
    target: Option<&TargetObj>,
    root: Option<&ContentEntity>,
    viewer: &Viewer,
    reveals: &RevealLedger,
) -> bool {
    let Some(owner) = secret_owner(item, target, root) else {
        return false;
    };

    if is_owner(viewer, &owner.uploader) {
        return false;
    }
    if reveals.shown_for(&owner.key, viewer) {
        return false;
    }
    if reveals.is_stale(&owner.key, viewer) {
        tracing::trace!(
            item = %item.key(),
            owner = %owner.key,
            viewer = %viewer.id,
            "ignoring reveal flag issued to another viewer"
        );
    }
    true
}

/// Whether the viewer may ask the server to reveal a hidden secret
///
/// There is nothing to reveal when the secret is already visible, and an
/// anonymous viewer cannot satisfy a reveal condition.
pub fn can_request_reveal(secret_hidden: bool, viewer: &Viewer) -> bool {
    secret_hidden && !viewer.is_anonymous()
}
