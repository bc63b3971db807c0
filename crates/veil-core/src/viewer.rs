//! The acting user

use serde::{Deserialize, Serialize};

use crate::identifiers::UserId;

/// Capability flags granted to a viewer platform-wide
///
/// Flags are necessary but not sufficient: moderation paths also require the
/// viewer to outrank the content's uploader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerPermissions {
    /// May delete (and close) other users' content
    #[serde(default)]
    pub can_delete: bool,
    /// May edit other users' content
    #[serde(default)]
    pub can_edit: bool,
    /// May grant XP rewards
    #[serde(default)]
    pub can_reward: bool,
}

impl ViewerPermissions {
    /// No capabilities
    pub fn none() -> Self {
        Self::default()
    }

    /// Every capability
    pub fn moderator() -> Self {
        Self {
            can_delete: true,
            can_edit: true,
            can_reward: true,
        }
    }
}

/// Identity, rank and capabilities of the current viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewer {
    /// Viewer id, `0` when logged out
    #[serde(default)]
    pub id: UserId,
    /// Viewer rank
    #[serde(default)]
    pub level: u8,
    /// Platform-wide capability flags
    #[serde(default)]
    pub permissions: ViewerPermissions,
}

impl Viewer {
    /// Logged-out viewer
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Viewer without capability flags
    pub fn new(id: impl Into<UserId>, level: u8) -> Self {
        Self {
            id: id.into(),
            level,
            permissions: ViewerPermissions::none(),
        }
    }

    /// Replace the capability flags
    pub fn with_permissions(mut self, permissions: ViewerPermissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Whether the viewer is logged out
    pub fn is_anonymous(&self) -> bool {
        self.id.is_anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_viewer_has_nothing() {
        let viewer = Viewer::anonymous();
        assert!(viewer.is_anonymous());
        assert_eq!(viewer.permissions, ViewerPermissions::none());
    }

    #[test]
    fn test_permissions_deserialize_camel_case() {
        let viewer: Viewer =
            serde_json::from_str(r#"{"id": 9, "level": 6, "permissions": {"canDelete": true}}"#)
                .unwrap();
        assert!(viewer.permissions.can_delete);
        assert!(!viewer.permissions.can_edit);
        assert!(!viewer.is_anonymous());
    }
}
