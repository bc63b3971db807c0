//! Reward eligibility
//!
//! The reward ceiling is derived, not stored: user-authored showcase content
//! gets the top of the scale; otherwise the targeted subject's level applies;
//! otherwise the root's level, where a positive level on a video or url root
//! collapses to 1; otherwise there is nothing to reward.
//!
//! `user_can_reward` is the authoritative answer. `xp_button_disabled_reason`
//! only explains to the UI why a shown reward control is inert.

use serde::{Deserialize, Serialize};
use std::fmt;

use veil_core::{
    ContentEntity, ContentKey, EngineConfig, EngineError, Result, TargetObj, Viewer,
};

use crate::ownership::{is_owner, outranks};

/// Whether a reward interface is open, and for which item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RewardInterface {
    /// No reward interface is open
    #[default]
    Closed,
    /// A reward interface is open for the given item
    OpenFor(ContentKey),
}

impl RewardInterface {
    /// Whether an interface is open for an item other than `key`
    pub fn is_open_elsewhere(&self, key: &ContentKey) -> bool {
        matches!(self, RewardInterface::OpenFor(open) if open != key)
    }
}

/// Why the reward control is disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpDisabledReason {
    /// The viewer already rewarded this item
    AlreadyRewarded,
    /// The item's reward ceiling is zero
    NoRewardLevel,
    /// Another item's reward interface is open
    RewardInProgress,
}

impl fmt::Display for XpDisabledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            XpDisabledReason::AlreadyRewarded => "already rewarded",
            XpDisabledReason::NoRewardLevel => "no reward available for this content",
            XpDisabledReason::RewardInProgress => "another reward is in progress",
        };
        f.write_str(text)
    }
}

/// Effective reward ceiling for an item
pub fn effective_reward_level(
    item: &ContentEntity,
    target: Option<&TargetObj>,
    root: Option<&ContentEntity>,
    config: &EngineConfig,
) -> u8 {
    if item.by_user {
        return config.by_user_reward_level;
    }

    // A subject without a positive level of its own defers to the root.
    let subject_level = target
        .and_then(|t| t.subject.as_ref())
        .and_then(|s| s.reward_level)
        .filter(|level| *level > 0);
    if let Some(level) = subject_level {
        return level.min(config.max_reward_level);
    }

    let Some(root) = root else {
        return 0;
    };
    match root.reward_level.unwrap_or(0) {
        0 => 0,
        _ if config.collapses_root(root.content_type) => 1,
        level => level.min(config.max_reward_level),
    }
}

/// Whether the viewer may grant a reward on the item
///
/// Requires the reward capability and a strictly higher rank than the
/// uploader. Nobody rewards their own content, and a viewer who took the
/// recommendation lane on an item cannot also reward it.
pub fn user_can_reward(item: &ContentEntity, viewer: &Viewer) -> bool {
    if item.is_tombstoned() || viewer.is_anonymous() || item.uploader.is_unknown() {
        return false;
    }
    if !viewer.permissions.can_reward || is_owner(viewer, &item.uploader) {
        return false;
    }
    if item.recommended_by(viewer.id) {
        tracing::trace!(
            item = %item.key(),
            viewer = %viewer.id,
            "viewer is in the recommendation lane"
        );
        return false;
    }
    outranks(viewer, &item.uploader)
}

/// Why the reward control is disabled, or `None` when rewarding is possible
pub fn xp_button_disabled_reason(
    item: &ContentEntity,
    viewer: &Viewer,
    reward_level: u8,
    interface: &RewardInterface,
    config: &EngineConfig,
) -> Option<XpDisabledReason> {
    if item.rewarded_by(viewer.id) {
        return Some(XpDisabledReason::AlreadyRewarded);
    }
    if reward_level == 0 {
        return Some(XpDisabledReason::NoRewardLevel);
    }
    if config.single_flight_rewards && interface.is_open_elsewhere(&item.key()) {
        return Some(XpDisabledReason::RewardInProgress);
    }
    None
}

/// Whether the viewer may recommend the item
///
/// Recommending is the lane for viewers who do not reward: it is closed to
/// the uploader, to anyone who already recommended or rewarded the item, and
/// to anonymous viewers.
pub fn can_recommend(item: &ContentEntity, viewer: &Viewer) -> bool {
    !item.is_tombstoned()
        && !viewer.is_anonymous()
        && !item.uploader.is_unknown()
        && !is_owner(viewer, &item.uploader)
        && !item.recommended_by(viewer.id)
        && !item.rewarded_by(viewer.id)
}

/// Check a requested reward level against the item's ceiling
pub fn validate_reward_level(requested: u8, ceiling: u8) -> Result<u8> {
    if requested == 0 || requested > ceiling {
        return Err(EngineError::RewardAboveCeiling { requested, ceiling });
    }
    Ok(requested)
}
