//! Property tests for the resolvers
//!
//! Generated content, viewers and reveal state check the rules that must
//! hold for every input, not just the hand-picked scenarios.

use proptest::prelude::*;

use veil_core::{
    Closer, ContentEntity, ContentKey, ContentType, EngineConfig, RevealFlag, RevealLedger,
    RewardRecord, SubjectRef, TargetObj, Uploader, UserId, Viewer, ViewerPermissions,
};
use veil_resolve::{
    effective_reward_level, resolve_close_permission, resolve_delete_permission,
    resolve_edit_permission, resolve_secret_hidden, Resolver,
};

// ============================================================================
// Strategies
// ============================================================================

fn content_type() -> impl Strategy<Value = ContentType> {
    prop::sample::select(ContentType::ALL.to_vec())
}

fn permissions() -> impl Strategy<Value = ViewerPermissions> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(can_delete, can_edit, can_reward)| {
        ViewerPermissions {
            can_delete,
            can_edit,
            can_reward,
        }
    })
}

prop_compose! {
    fn arb_viewer()(id in 0u64..6, level in 0u8..8, permissions in permissions()) -> Viewer {
        Viewer::new(id, level).with_permissions(permissions)
    }
}

prop_compose! {
    fn arb_uploader()(id in 0u64..6, level in 0u8..8) -> Uploader {
        Uploader::new(id, level)
    }
}

prop_compose! {
    fn arb_subject_ref()(
        id in 1u64..4,
        uploader in arb_uploader(),
        secret in prop::option::of(prop::sample::select(vec!["", "x", "42"])),
        reward_level in prop::option::of(0u8..8),
    ) -> SubjectRef {
        SubjectRef {
            id: id.into(),
            uploader,
            secret_answer: secret.map(String::from),
            reward_level,
            ..SubjectRef::default()
        }
    }
}

prop_compose! {
    fn arb_entity()(
        content_type in content_type(),
        id in 1u64..10,
        uploader in arb_uploader(),
        secret in prop::option::of(prop::sample::select(vec!["", "x"])),
        reward_level in prop::option::of(0u8..8),
        closer in prop::option::of((0u64..6, 0u8..8)),
        by_user in any::<bool>(),
        target in prop::option::of(arb_subject_ref()),
        rewarders in prop::collection::vec(0u64..6, 0..3),
        deleted in any::<bool>(),
    ) -> ContentEntity {
        let mut entity = ContentEntity::new(content_type, id, uploader);
        entity.secret_answer = secret.map(String::from);
        entity.reward_level = reward_level;
        entity.is_closed_by = closer.map(|(id, level)| Closer::new(id, level, "closer"));
        entity.by_user = by_user;
        entity.target_obj = target.map(TargetObj::subject);
        entity.rewards = rewarders
            .into_iter()
            .map(|id| RewardRecord { rewarder_id: UserId(id), amount: 1 })
            .collect();
        entity.is_deleted = deleted;
        entity
    }
}

prop_compose! {
    fn arb_root()(
        content_type in prop::sample::select(vec![
            ContentType::Subject,
            ContentType::Video,
            ContentType::Url,
        ]),
        uploader in arb_uploader(),
        secret in prop::option::of(prop::sample::select(vec!["", "y"])),
        reward_level in prop::option::of(0u8..8),
    ) -> ContentEntity {
        let mut root = ContentEntity::new(content_type, 100, uploader);
        root.secret_answer = secret.map(String::from);
        root.reward_level = reward_level;
        root
    }
}

fn arb_flag() -> impl Strategy<Value = Option<RevealFlag>> {
    prop::option::of((any::<bool>(), 0u64..6).prop_map(|(shown, id)| RevealFlag {
        shown,
        shown_for_viewer_id: UserId(id),
    }))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn test_unknown_uploader_fails_closed(
        content_type in content_type(),
        viewer in arb_viewer(),
    ) {
        let config = EngineConfig::default();
        let item = ContentEntity::new(content_type, 1, Uploader::default());

        let target = item.target_obj.as_ref();
        prop_assert!(!resolve_edit_permission(&item, target, &viewer, &config));
        prop_assert!(!resolve_delete_permission(&item, &viewer, &config));
        prop_assert!(!resolve_close_permission(&item, &viewer));
    }

    #[test]
    fn test_anonymous_viewer_never_edits_or_deletes(
        item in arb_entity(),
        permissions in permissions(),
        level in 0u8..8,
    ) {
        let config = EngineConfig::default();
        let viewer = Viewer { id: UserId::ANONYMOUS, level, permissions };

        let target = item.target_obj.as_ref();
        prop_assert!(!resolve_edit_permission(&item, target, &viewer, &config));
        prop_assert!(!resolve_delete_permission(&item, &viewer, &config));
    }

    #[test]
    fn test_target_subject_secret_shadows_root(
        subject_uploader in arb_uploader(),
        root_uploader in arb_uploader(),
        viewer in arb_viewer(),
        subject_flag in arb_flag(),
        root_flag in (any::<bool>(), 0u64..6),
    ) {
        let item = ContentEntity::new(ContentType::Comment, 7, Uploader::new(50, 1));
        let target = TargetObj::subject(SubjectRef {
            id: 5.into(),
            uploader: subject_uploader,
            secret_answer: Some("x".into()),
            ..SubjectRef::default()
        });
        let mut root = ContentEntity::new(ContentType::Video, 8, root_uploader);
        root.secret_answer = Some("y".into());

        let mut reveals = RevealLedger::new();
        if let Some(flag) = subject_flag {
            reveals.record(ContentKey::subject(5), flag);
        }
        let baseline = resolve_secret_hidden(&item, Some(&target), None, &viewer, &reveals);

        let without_root_flag =
            resolve_secret_hidden(&item, Some(&target), Some(&root), &viewer, &reveals);
        let (shown, id) = root_flag;
        let toggled = reveals.clone().with(
            root.key(),
            RevealFlag { shown, shown_for_viewer_id: UserId(id) },
        );
        let with_root_flag =
            resolve_secret_hidden(&item, Some(&target), Some(&root), &viewer, &toggled);

        prop_assert_eq!(without_root_flag, baseline);
        prop_assert_eq!(with_root_flag, baseline);
    }

    #[test]
    fn test_by_user_always_gets_top_reward_level(
        item in arb_entity(),
        target in prop::option::of(arb_subject_ref()),
        root in prop::option::of(arb_root()),
    ) {
        let config = EngineConfig::default();
        let mut item = item;
        item.by_user = true;
        let target = target.map(TargetObj::subject);

        prop_assert_eq!(
            effective_reward_level(&item, target.as_ref(), root.as_ref(), &config),
            5
        );
    }

    #[test]
    fn test_reward_level_never_exceeds_scale(
        item in arb_entity(),
        root in prop::option::of(arb_root()),
    ) {
        let config = EngineConfig::default();
        let level = effective_reward_level(&item, item.target_obj.as_ref(), root.as_ref(), &config);
        prop_assert!(level <= config.max_reward_level);
    }

    #[test]
    fn test_resolve_is_idempotent(
        item in arb_entity(),
        root in prop::option::of(arb_root()),
        viewer in arb_viewer(),
        flag in arb_flag(),
    ) {
        let resolver = Resolver::default();
        let mut reveals = RevealLedger::new();
        if let Some(flag) = flag {
            reveals.record(ContentKey::subject(1), flag);
        }
        let target = item.target_obj.clone();

        let first = resolver.resolve(&item, target.as_ref(), root.as_ref(), &viewer, &reveals);
        let second = resolver.resolve(&item, target.as_ref(), root.as_ref(), &viewer, &reveals);
        prop_assert_eq!(first, second);
    }
}
