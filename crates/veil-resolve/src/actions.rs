//! Action intents and the gate in front of the action layer
//!
//! Edits, deletes, closes, rewards and reveal requests are round trips to an
//! external action layer. The engine does not interpret them; it only refuses
//! to forward an intent whose affordance the current resolution does not
//! grant. Nothing here changes a resolution: a permission only appears once
//! the confirmed snapshot that grants it arrives, and a failed request leaves
//! the previous snapshot authoritative.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use veil_core::{ContentId, ContentKey, ContentType, DenialReason, EngineError, Result};

use crate::facade::Resolution;
use crate::reward::validate_reward_level;

/// Fields an edit may change; opaque to the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New secret answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_answer: Option<String>,
}

/// A side-effecting request bound for the action layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionIntent {
    /// Edit an item
    Edit {
        /// Item to edit
        key: ContentKey,
        /// Changes to apply
        patch: ContentPatch,
    },
    /// Delete an item
    Delete {
        /// Item to delete
        key: ContentKey,
    },
    /// Close, or reopen, a subject's comment section
    Close {
        /// Subject to close or reopen
        key: ContentKey,
    },
    /// Grant an XP reward
    Reward {
        /// Item to reward
        key: ContentKey,
        /// Requested reward level
        level: u8,
    },
    /// Ask the server to reveal a secret to the viewer
    RevealSecret {
        /// Item whose resolution exposed the reveal control
        key: ContentKey,
        /// Subject owning the secret
        subject_id: ContentId,
    },
}

impl ActionIntent {
    /// Short action name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            ActionIntent::Edit { .. } => "edit",
            ActionIntent::Delete { .. } => "delete",
            ActionIntent::Close { .. } => "close",
            ActionIntent::Reward { .. } => "reward",
            ActionIntent::RevealSecret { .. } => "reveal_secret",
        }
    }

    /// Item the intent was issued from
    pub fn key(&self) -> ContentKey {
        match self {
            ActionIntent::Edit { key, .. }
            | ActionIntent::Delete { key }
            | ActionIntent::Close { key }
            | ActionIntent::Reward { key, .. }
            | ActionIntent::RevealSecret { key, .. } => *key,
        }
    }
}

/// External action layer
#[async_trait]
pub trait ActionLayer: Send + Sync {
    /// Carry out an intent; failures come back as [`EngineError::Dispatch`]
    async fn dispatch(&self, intent: ActionIntent) -> Result<()>;
}

/// Check an intent against the resolution it was issued from
pub fn check_intent(resolution: &Resolution, intent: &ActionIntent) -> Result<()> {
    if intent.key() != resolution.key {
        return Err(EngineError::invalid(format!(
            "{} intent for {} checked against resolution for {}",
            intent.name(),
            intent.key(),
            resolution.key
        )));
    }

    let deny = |reason: DenialReason| -> Result<()> {
        Err(EngineError::action_denied(intent.name(), reason))
    };
    match intent {
        ActionIntent::Edit { .. } if !resolution.can_edit => deny(DenialReason::Unauthorized),
        ActionIntent::Delete { .. } if !resolution.can_delete => deny(DenialReason::Unauthorized),
        ActionIntent::Close { .. } if !resolution.can_close => {
            if resolution.comments_locked {
                deny(DenialReason::InvalidTransition)
            } else {
                deny(DenialReason::Unauthorized)
            }
        }
        ActionIntent::Reward { level, .. } => {
            if !resolution.can_reward {
                return deny(DenialReason::Unauthorized);
            }
            if resolution.xp_disabled_reason.is_some() {
                return deny(DenialReason::InvalidTransition);
            }
            validate_reward_level(*level, resolution.reward_level).map(|_| ())
        }
        ActionIntent::RevealSecret { subject_id, .. } => {
            if !resolution.can_reveal {
                return deny(DenialReason::InvalidTransition);
            }
            // Only subject secrets are revealable; a root answer is not.
            match resolution.secret_owner {
                Some(owner)
                    if owner.content_type == ContentType::Subject && owner.id == *subject_id =>
                {
                    Ok(())
                }
                _ => Err(EngineError::invalid(format!(
                    "secret of {} is not owned by subject {subject_id}",
                    resolution.key
                ))),
            }
        }
        _ => Ok(()),
    }
}

/// Gate in front of an [`ActionLayer`]
#[derive(Debug, Clone)]
pub struct ActionGate<L> {
    layer: L,
}

impl<L: ActionLayer> ActionGate<L> {
    /// Gate the given layer
    pub fn new(layer: L) -> Self {
        Self { layer }
    }

    /// Underlying action layer
    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Forward an intent to the action layer if the resolution permits it
    ///
    /// The intent is forwarded unchanged. Whatever the layer answers, the
    /// resolution is not touched; the caller re-resolves once the store
    /// publishes the confirmed snapshot.
    pub async fn submit(&self, resolution: &Resolution, intent: ActionIntent) -> Result<()> {
        if let Err(err) = check_intent(resolution, &intent) {
            tracing::debug!(
                action = intent.name(),
                key = %intent.key(),
                error = %err,
                "intent refused"
            );
            return Err(err);
        }

        let action = intent.name();
        let key = intent.key();
        tracing::debug!(action, %key, "forwarding intent");
        let result = self.layer.dispatch(intent).await;
        if let Err(err) = &result {
            tracing::debug!(action, %key, error = %err, "action layer rejected intent");
        }
        result
    }
}
