//! Ownership and rank comparison
//!
//! Every other resolver builds on these three predicates. An unknown uploader
//! is `{id: 0, level: 0}`; since the anonymous viewer never owns anything,
//! malformed content can neither be claimed nor outrank a real viewer.

use veil_core::{Uploader, Viewer};

/// Whether the viewer's rank is strictly above the uploader's
pub fn outranks(viewer: &Viewer, uploader: &Uploader) -> bool {
    viewer.level > uploader.level
}

/// Whether the viewer uploaded the content
///
/// Two anonymous ids never match.
pub fn is_owner(viewer: &Viewer, uploader: &Uploader) -> bool {
    !viewer.is_anonymous() && viewer.id == uploader.id
}

/// Whether the viewer is logged out
pub fn is_anonymous(viewer: &Viewer) -> bool {
    viewer.is_anonymous()
}
