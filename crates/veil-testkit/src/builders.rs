//! Entity and viewer builders

use veil_core::{
    Closer, ContentEntity, ContentId, ContentType, Recommendation, RewardRecord,
    SecretAttachment, SubjectRef, TargetObj, Uploader, UserId, Viewer, ViewerPermissions,
};

/// Builder for [`ContentEntity`] snapshots
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    entity: ContentEntity,
}

impl EntityBuilder {
    /// Start from a bare entity with an unknown uploader
    pub fn new(content_type: ContentType, id: u64) -> Self {
        Self {
            entity: ContentEntity::new(content_type, id, Uploader::default()),
        }
    }

    /// Start a subject
    pub fn subject(id: u64) -> Self {
        Self::new(ContentType::Subject, id)
    }

    /// Start a comment
    pub fn comment(id: u64) -> Self {
        Self::new(ContentType::Comment, id)
    }

    /// Set the uploader
    pub fn uploader(mut self, id: u64, level: u8) -> Self {
        self.entity.uploader = Uploader::new(id, level);
        self
    }

    /// Set a secret answer
    pub fn secret_answer(mut self, answer: &str) -> Self {
        self.entity.secret_answer = Some(answer.to_string());
        self
    }

    /// Set a secret attachment
    pub fn secret_attachment(mut self, file_name: &str) -> Self {
        self.entity.secret_attachment = Some(SecretAttachment {
            file_name: file_name.to_string(),
            file_path: format!("secret/{file_name}"),
        });
        self
    }

    /// Set the entity's own reward level
    pub fn reward_level(mut self, level: u8) -> Self {
        self.entity.reward_level = Some(level);
        self
    }

    /// Mark the comment section closed by the given user
    pub fn closed_by(mut self, id: u64, level: u8) -> Self {
        self.entity.is_closed_by = Some(Closer::new(id, level, format!("user{id}")));
        self
    }

    /// Mark as user-authored showcase content
    pub fn by_user(mut self) -> Self {
        self.entity.by_user = true;
        self
    }

    /// Attach to a subject
    pub fn target_subject(mut self, subject: SubjectRef) -> Self {
        self.entity.target_obj = Some(TargetObj::subject(subject));
        self
    }

    /// Set the root entity
    pub fn root(mut self, content_type: ContentType, id: u64) -> Self {
        self.entity.root_type = Some(content_type);
        self.entity.root_id = Some(ContentId(id));
        self
    }

    /// Record a reward from the given user
    pub fn rewarded_by(mut self, id: u64) -> Self {
        self.entity.rewards.push(RewardRecord {
            rewarder_id: UserId(id),
            amount: 1,
        });
        self
    }

    /// Record a recommendation from the given user
    pub fn recommended_by(mut self, id: u64) -> Self {
        self.entity.recommendations.push(Recommendation { user_id: UserId(id) });
        self
    }

    /// Soft-delete the entity
    pub fn deleted(mut self) -> Self {
        self.entity.is_deleted = true;
        self
    }

    /// Finish
    pub fn build(self) -> ContentEntity {
        self.entity
    }
}

/// Subject fragment as carried on a comment's target
pub fn subject_ref(id: u64, uploader: Uploader, secret_answer: Option<&str>) -> SubjectRef {
    SubjectRef {
        id: ContentId(id),
        uploader,
        secret_answer: secret_answer.map(String::from),
        ..SubjectRef::default()
    }
}

/// Logged-in viewer with no capability flags
pub fn viewer(id: u64, level: u8) -> Viewer {
    Viewer::new(id, level)
}

/// Viewer holding every capability flag
pub fn moderator(id: u64, level: u8) -> Viewer {
    Viewer::new(id, level).with_permissions(ViewerPermissions::moderator())
}

/// Viewer with the reward capability only
pub fn rewarder(id: u64, level: u8) -> Viewer {
    Viewer::new(id, level).with_permissions(ViewerPermissions {
        can_reward: true,
        ..ViewerPermissions::none()
    })
}
