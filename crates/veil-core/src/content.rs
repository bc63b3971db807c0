//! Content entity snapshots
//!
//! Entities are immutable snapshots replaced wholesale by the entity store on
//! every confirmed edit, close or delete. Field names follow the camelCase
//! JSON the store emits, so snapshots deserialize directly.

use serde::{Deserialize, Serialize};

use crate::identifiers::{ContentId, ContentKey, ContentType, UserId};

/// Uploader of a piece of content
///
/// Absent uploaders deserialize to `{id: 0, level: 0}`, which never outranks
/// or matches a real viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uploader {
    /// Uploader user id
    #[serde(default)]
    pub id: UserId,
    /// Uploader rank
    #[serde(default)]
    pub level: u8,
}

impl Uploader {
    /// Create an uploader
    pub fn new(id: impl Into<UserId>, level: u8) -> Self {
        Self {
            id: id.into(),
            level,
        }
    }

    /// Whether the uploader is unknown (missing or malformed)
    pub fn is_unknown(&self) -> bool {
        self.id.is_anonymous()
    }
}

/// User who closed a subject's comment section
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Closer {
    /// Closer user id
    pub id: UserId,
    /// Closer rank at the time of closing
    #[serde(default)]
    pub level: u8,
    /// Closer display name
    #[serde(default)]
    pub username: String,
}

impl Closer {
    /// Create a closer record
    pub fn new(id: impl Into<UserId>, level: u8, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level,
            username: username.into(),
        }
    }
}

/// File attached to a subject as part of its secret
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretAttachment {
    /// Original file name
    pub file_name: String,
    /// Storage path of the file
    #[serde(default)]
    pub file_path: String,
}

/// A reward granted on a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRecord {
    /// User who granted the reward
    pub rewarder_id: UserId,
    /// Reward amount
    pub amount: u32,
}

/// A recommendation of a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// User who recommended the content
    pub user_id: UserId,
}

/// Subject fields carried on a comment's target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    /// Subject id
    pub id: ContentId,
    /// Subject uploader
    #[serde(default)]
    pub uploader: Uploader,
    /// Secret answer, if the subject has one
    #[serde(default)]
    pub secret_answer: Option<String>,
    /// Secret attachment, if the subject has one
    #[serde(default)]
    pub secret_attachment: Option<SecretAttachment>,
    /// Reward level configured on the subject
    #[serde(default)]
    pub reward_level: Option<u8>,
}

impl SubjectRef {
    /// Entity key of the referenced subject
    pub fn key(&self) -> ContentKey {
        ContentKey::subject(self.id)
    }

    /// Whether the subject defines secret material
    pub fn has_secret(&self) -> bool {
        has_secret(&self.secret_answer, &self.secret_attachment)
    }
}

/// Comment fields carried on a reply's target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRef {
    /// Comment id
    pub id: ContentId,
    /// Comment uploader
    #[serde(default)]
    pub uploader: Uploader,
    /// Tombstone marker for a comment that no longer exists
    #[serde(default)]
    pub not_found: bool,
}

/// What a comment or reply is attached to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetObj {
    /// Comment being replied to
    #[serde(default)]
    pub comment: Option<CommentRef>,
    /// Subject being responded to
    #[serde(default)]
    pub subject: Option<SubjectRef>,
}

impl TargetObj {
    /// Target pointing at a subject
    pub fn subject(subject: SubjectRef) -> Self {
        Self {
            comment: None,
            subject: Some(subject),
        }
    }
}

/// Snapshot of a content entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntity {
    /// Id, unique within the content type
    pub id: ContentId,
    /// Content type
    pub content_type: ContentType,
    /// Uploader, `{0, 0}` when unknown
    #[serde(default)]
    pub uploader: Uploader,
    /// Secret answer (subjects and roots)
    #[serde(default)]
    pub secret_answer: Option<String>,
    /// Secret attachment (subjects)
    #[serde(default)]
    pub secret_attachment: Option<SecretAttachment>,
    /// Reward level configured on the entity itself
    #[serde(default)]
    pub reward_level: Option<u8>,
    /// Rewards granted so far
    #[serde(default)]
    pub rewards: Vec<RewardRecord>,
    /// Recommendations received so far
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Closer of a subject's comment section
    #[serde(default)]
    pub is_closed_by: Option<Closer>,
    /// User-authored showcase content
    #[serde(default)]
    pub by_user: bool,
    /// What this item is attached to
    #[serde(default)]
    pub target_obj: Option<TargetObj>,
    /// Id of the root entity
    #[serde(default)]
    pub root_id: Option<ContentId>,
    /// Type of the root entity
    #[serde(default)]
    pub root_type: Option<ContentType>,
    /// Tombstone flag set by a soft delete
    #[serde(default)]
    pub is_deleted: bool,
    /// Tombstone flag set when the store could not find the entity
    #[serde(default)]
    pub not_found: bool,
}

impl ContentEntity {
    /// Create a bare entity with the given identity and uploader
    pub fn new(content_type: ContentType, id: impl Into<ContentId>, uploader: Uploader) -> Self {
        Self {
            id: id.into(),
            content_type,
            uploader,
            secret_answer: None,
            secret_attachment: None,
            reward_level: None,
            rewards: Vec::new(),
            recommendations: Vec::new(),
            is_closed_by: None,
            by_user: false,
            target_obj: None,
            root_id: None,
            root_type: None,
            is_deleted: false,
            not_found: false,
        }
    }

    /// Parse an entity snapshot from store JSON
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Identity of this entity
    pub fn key(&self) -> ContentKey {
        ContentKey::new(self.content_type, self.id)
    }

    /// Identity of the root entity, when both halves are known
    pub fn root_key(&self) -> Option<ContentKey> {
        match (self.root_type, self.root_id) {
            (Some(content_type), Some(id)) => Some(ContentKey::new(content_type, id)),
            _ => None,
        }
    }

    /// Whether the entity carries a secret answer or attachment
    pub fn has_secret(&self) -> bool {
        has_secret(&self.secret_answer, &self.secret_attachment)
    }

    /// Whether the entity carries a non-empty secret answer
    pub fn has_secret_answer(&self) -> bool {
        non_empty(&self.secret_answer)
    }

    /// Whether the entity is deleted or not found
    pub fn is_tombstoned(&self) -> bool {
        self.is_deleted || self.not_found
    }

    /// Whether the entity is a subject with a closed comment section
    pub fn is_closed(&self) -> bool {
        self.content_type == ContentType::Subject && self.is_closed_by.is_some()
    }

    /// Subject this item targets, if any
    pub fn target_subject(&self) -> Option<&SubjectRef> {
        self.target_obj.as_ref().and_then(|t| t.subject.as_ref())
    }

    /// Whether the user already rewarded this entity
    pub fn rewarded_by(&self, user: UserId) -> bool {
        self.rewards.iter().any(|r| r.rewarder_id == user)
    }

    /// Whether the user already recommended this entity
    pub fn recommended_by(&self, user: UserId) -> bool {
        self.recommendations.iter().any(|r| r.user_id == user)
    }

    /// Project a subject entity onto the fields a comment target carries
    pub fn to_subject_ref(&self) -> Option<SubjectRef> {
        if self.content_type != ContentType::Subject {
            return None;
        }
        Some(SubjectRef {
            id: self.id,
            uploader: self.uploader,
            secret_answer: self.secret_answer.clone(),
            secret_attachment: self.secret_attachment.clone(),
            reward_level: self.reward_level,
        })
    }
}

fn non_empty(answer: &Option<String>) -> bool {
    answer.as_deref().map(|a| !a.is_empty()).unwrap_or(false)
}

fn has_secret(answer: &Option<String>, attachment: &Option<SecretAttachment>) -> bool {
    non_empty(answer) || attachment.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store_snapshot() {
        let json = r#"{
            "id": 41,
            "contentType": "comment",
            "uploader": {"id": 3, "level": 2},
            "rewards": [{"rewarderId": 9, "amount": 2}],
            "recommendations": [{"userId": 7}],
            "targetObj": {"subject": {"id": 5, "uploader": {"id": 4}, "secretAnswer": "42"}},
            "rootId": 8,
            "rootType": "video"
        }"#;

        let entity = ContentEntity::from_json(json).unwrap();
        assert_eq!(entity.key(), ContentKey::comment(41));
        assert_eq!(entity.root_key(), Some(ContentKey::new(ContentType::Video, 8)));
        assert!(entity.rewarded_by(UserId(9)));
        assert!(entity.recommended_by(UserId(7)));
        assert!(!entity.by_user);

        let subject = entity.target_subject().unwrap();
        assert!(subject.has_secret());
        assert_eq!(subject.uploader, Uploader::new(4, 0));
    }

    #[test]
    fn test_missing_uploader_is_unknown() {
        let entity = ContentEntity::from_json(r#"{"id": 1, "contentType": "subject"}"#).unwrap();
        assert!(entity.uploader.is_unknown());
        assert_eq!(entity.uploader.level, 0);
    }

    #[test]
    fn test_empty_secret_answer_is_not_a_secret() {
        let mut entity = ContentEntity::new(ContentType::Subject, 1, Uploader::new(1, 1));
        entity.secret_answer = Some(String::new());
        assert!(!entity.has_secret());

        entity.secret_attachment = Some(SecretAttachment {
            file_name: "answer.png".into(),
            file_path: String::new(),
        });
        assert!(entity.has_secret());
        assert!(!entity.has_secret_answer());
    }

    #[test]
    fn test_tombstones_and_closure() {
        let mut subject = ContentEntity::new(ContentType::Subject, 1, Uploader::new(1, 1));
        assert!(!subject.is_tombstoned());
        subject.is_closed_by = Some(Closer::new(2, 3, "mod"));
        assert!(subject.is_closed());

        subject.not_found = true;
        assert!(subject.is_tombstoned());

        let mut comment = ContentEntity::new(ContentType::Comment, 1, Uploader::new(1, 1));
        comment.is_closed_by = Some(Closer::new(2, 3, "mod"));
        assert!(!comment.is_closed());
    }

    #[test]
    fn test_subject_projection() {
        let mut subject = ContentEntity::new(ContentType::Subject, 5, Uploader::new(4, 1));
        subject.reward_level = Some(3);
        let projected = subject.to_subject_ref().unwrap();
        assert_eq!(projected.key(), ContentKey::subject(5));
        assert_eq!(projected.reward_level, Some(3));

        let video = ContentEntity::new(ContentType::Video, 5, Uploader::new(4, 1));
        assert!(video.to_subject_ref().is_none());
    }
}
