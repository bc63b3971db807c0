//! Per-item resolution
//!
//! [`Resolver::resolve`] composes the secret, permission and reward resolvers
//! into the single value rendering consumes. It is a pure function of its
//! inputs: calling it twice with the same snapshots gives the same answer, so
//! callers may memoize it but never need to.
//!
//! [`Resolver::resolve_by_key`] is the store-facing entry point. It gathers
//! the dependency set (item, target subject, root) from an
//! [`EntityAccessor`] and reads the viewer and reveal ledger from one session
//! snapshot, so a pass never mixes two viewer identities.

use serde::Serialize;

use veil_core::{
    ContentEntity, ContentKey, ContentType, DenialReason, EngineConfig, EntityAccessor, RevealLedger,
    TargetObj, Viewer, ViewerSession,
};

use crate::permission::{
    can_submit_comment, resolve_close_permission, resolve_delete_permission,
    resolve_edit_permission,
};
use crate::reward::{
    can_recommend, effective_reward_level, user_can_reward, xp_button_disabled_reason,
    RewardInterface, XpDisabledReason,
};
use crate::secret::{can_request_reveal, resolve_secret_hidden, secret_owner};

/// Everything rendering needs to know about one item for one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Item the resolution is for
    pub key: ContentKey,
    /// Secret material must not be shown
    pub secret_hidden: bool,
    /// Entity whose secret governs the item
    pub secret_owner: Option<ContentKey>,
    /// The viewer may ask for the secret to be revealed
    pub can_reveal: bool,
    /// Edit control may be rendered
    pub can_edit: bool,
    /// Delete control may be rendered
    pub can_delete: bool,
    /// Close or reopen control may be rendered
    pub can_close: bool,
    /// Comment submission is blocked on a closed subject
    pub comments_locked: bool,
    /// Effective reward ceiling
    pub reward_level: u8,
    /// Reward control may be rendered
    pub can_reward: bool,
    /// Why the reward control is inert, if it is
    pub xp_disabled_reason: Option<XpDisabledReason>,
    /// Recommend control may be rendered
    pub can_recommend: bool,
}

/// Resolution facade
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: EngineConfig,
}

impl Resolver {
    /// Resolver with the given policy
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Policy in use
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve an item with no reward interface open
    pub fn resolve(
        &self,
        item: &ContentEntity,
        target: Option<&TargetObj>,
        root: Option<&ContentEntity>,
        viewer: &Viewer,
        reveals: &RevealLedger,
    ) -> Resolution {
        self.resolve_with_interface(
            item,
            target,
            root,
            viewer,
            reveals,
            &RewardInterface::Closed,
        )
    }

    /// Resolve an item given the current reward interface state
    pub fn resolve_with_interface(
        &self,
        item: &ContentEntity,
        target: Option<&TargetObj>,
        root: Option<&ContentEntity>,
        viewer: &Viewer,
        reveals: &RevealLedger,
        interface: &RewardInterface,
    ) -> Resolution {
        let secret_hidden = resolve_secret_hidden(item, target, root, viewer, reveals);
        let reward_level = effective_reward_level(item, target, root, &self.config);

        Resolution {
            key: item.key(),
            secret_hidden,
            secret_owner: secret_owner(item, target, root).map(|owner| owner.key),
            can_reveal: can_request_reveal(secret_hidden, viewer),
            can_edit: resolve_edit_permission(item, target, viewer, &self.config),
            can_delete: resolve_delete_permission(item, viewer, &self.config),
            can_close: resolve_close_permission(item, viewer),
            comments_locked: item.content_type == ContentType::Subject && !can_submit_comment(item),
            reward_level,
            can_reward: user_can_reward(item, viewer),
            xp_disabled_reason: xp_button_disabled_reason(
                item,
                viewer,
                reward_level,
                interface,
                &self.config,
            ),
            can_recommend: can_recommend(item, viewer),
        }
    }

    /// Load the dependency set for `key` and resolve it
    ///
    /// Returns `None` while the item itself is not loaded. The target subject
    /// is replaced by the accessor's copy when one is loaded, so the edit rule
    /// and the secret walk see the same subject; an unloaded root is treated
    /// as absent.
    pub fn resolve_by_key<A: EntityAccessor + ?Sized>(
        &self,
        accessor: &A,
        key: &ContentKey,
        session: &ViewerSession,
        interface: &RewardInterface,
    ) -> Option<Resolution> {
        let Some(mut item) = accessor.get_entity(key) else {
            tracing::trace!(%key, reason = %DenialReason::MissingEntity, "item not loaded");
            return None;
        };

        // The subject fragment a comment carries can lag behind the store.
        if let Some(subject) = item.target_obj.as_mut().and_then(|t| t.subject.as_mut()) {
            if let Some(fresh) = accessor
                .get_entity(&subject.key())
                .and_then(|entity| entity.to_subject_ref())
            {
                *subject = fresh;
            }
        }

        let root = item.root_key().and_then(|root_key| {
            let root = accessor.get_entity(&root_key);
            if root.is_none() {
                tracing::trace!(
                    %key,
                    %root_key,
                    reason = %DenialReason::MissingEntity,
                    "root not loaded"
                );
            }
            root
        });

        let snapshot = session.snapshot();
        let mut reveals = snapshot.reveals;
        let candidates = [
            Some(item.key()),
            item.target_subject().map(|s| s.key()),
            root.as_ref().map(|r| r.key()),
        ];
        for candidate in candidates.into_iter().flatten() {
            let flag = accessor.get_reveal_state(&candidate);
            if flag.applies_to(&snapshot.viewer) {
                reveals.record(candidate, flag);
            } else if flag.is_stale_for(&snapshot.viewer) {
                tracing::trace!(
                    key = %candidate,
                    reason = %DenialReason::StaleRevealState,
                    "ignoring stored reveal state"
                );
            }
        }

        Some(self.resolve_with_interface(
            &item,
            item.target_obj.as_ref(),
            root.as_ref(),
            &snapshot.viewer,
            &reveals,
            interface,
        ))
    }
}
