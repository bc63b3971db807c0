//! Identifier types for users and content
//!
//! Content is identified by the pair `(ContentType, ContentId)`; ids are only
//! unique within a content type, so every lookup goes through [`ContentKey`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

/// User identifier
///
/// `UserId(0)` is reserved for the anonymous (logged-out) viewer and for
/// content whose uploader is unknown.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// The anonymous user id
    pub const ANONYMOUS: UserId = UserId(0);

    /// Create a user id from its raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Whether this is the anonymous id
    pub fn is_anonymous(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Content identifier, unique within a [`ContentType`]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContentId(pub u64);

impl ContentId {
    /// Create a content id from its raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Kind of content an entity represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    /// A comment on a subject, video, url or another comment
    Comment,
    /// A discussion subject, possibly carrying a secret answer
    Subject,
    /// A video page
    Video,
    /// A shared link
    Url,
    /// A nested reply inside a comment thread
    Reply,
    /// A completed mission submission
    MissionPass,
    /// An AI-generated story entry
    AiStory,
}

impl ContentType {
    /// All content types, in declaration order
    pub const ALL: [ContentType; 7] = [
        ContentType::Comment,
        ContentType::Subject,
        ContentType::Video,
        ContentType::Url,
        ContentType::Reply,
        ContentType::MissionPass,
        ContentType::AiStory,
    ];

    /// Wire name of the content type
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Comment => "comment",
            ContentType::Subject => "subject",
            ContentType::Video => "video",
            ContentType::Url => "url",
            ContentType::Reply => "reply",
            ContentType::MissionPass => "mission-pass",
            ContentType::AiStory => "ai-story",
        }
    }

    /// Whether comments can hang off this type as a root
    pub fn is_root_type(&self) -> bool {
        matches!(
            self,
            ContentType::Subject | ContentType::Video | ContentType::Url
        )
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| EngineError::invalid(format!("unknown content type: {s}")))
    }
}

/// Identity of a content entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentKey {
    /// Content type half of the identity
    pub content_type: ContentType,
    /// Id half of the identity
    pub id: ContentId,
}

impl ContentKey {
    /// Create a key from a type and raw id
    pub fn new(content_type: ContentType, id: impl Into<ContentId>) -> Self {
        Self {
            content_type,
            id: id.into(),
        }
    }

    /// Key of a subject
    pub fn subject(id: impl Into<ContentId>) -> Self {
        Self::new(ContentType::Subject, id)
    }

    /// Key of a comment
    pub fn comment(id: impl Into<ContentId>) -> Self {
        Self::new(ContentType::Comment, id)
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.content_type, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_round_trips_through_wire_name() {
        for content_type in ContentType::ALL {
            let parsed: ContentType = content_type.as_str().parse().unwrap();
            assert_eq!(parsed, content_type);
        }
        assert!("podcast".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_content_type_serde_uses_kebab_case() {
        let json = serde_json::to_string(&ContentType::MissionPass).unwrap();
        assert_eq!(json, "\"mission-pass\"");
    }

    #[test]
    fn test_anonymous_user() {
        assert!(UserId::ANONYMOUS.is_anonymous());
        assert!(UserId::default().is_anonymous());
        assert!(!UserId::new(3).is_anonymous());
    }

    #[test]
    fn test_content_key_display() {
        assert_eq!(ContentKey::subject(12).to_string(), "subject:12");
    }
}
