// ABOUTME: Integration tests for the tag lifecycle: create, read, update, delete.
// ABOUTME: Runs the manager against the in-memory runtime with injected failures.

mod support;

use support::{AAA, BBB, CCC, NGINX, pinned, runtime_with};
use tagkeep::runtime::{Call, InMemoryRuntime};
use tagkeep::tag::{TagErrorKind, TagManager, TagSpec, TagState};
use tagkeep::types::Digest;

fn digests(state: &TagState) -> Vec<&str> {
    state.all.iter().map(Digest::as_str).collect()
}

async fn created(runtime: InMemoryRuntime) -> (TagManager<InMemoryRuntime>, TagState) {
    let manager = TagManager::new(runtime);
    let state = manager
        .create(TagSpec::new(NGINX).unwrap())
        .await
        .expect("create should succeed");
    (manager, state)
}

/// Point the registry at `digest` and run the read that precedes an update.
async fn advance(manager: &TagManager<InMemoryRuntime>, state: &mut TagState, digest: &str) {
    manager.runtime().publish(NGINX, digest).unwrap();
    manager.read(state).await.expect("read should succeed");
}

// =============================================================================
// Create
// =============================================================================

mod create {
    use super::*;

    #[tokio::test]
    async fn tracks_resolved_digest() {
        let (manager, state) = created(runtime_with(NGINX, AAA)).await;

        assert_eq!(state.id.as_ref().map(|id| id.as_str()), Some(NGINX));
        assert_eq!(state.latest.as_str(), AAA);
        assert_eq!(state.full_image_name, "library/nginx@sha256:aaa");
        assert_eq!(digests(&state), vec![AAA]);
        assert!(manager.runtime().has_image(&pinned(AAA)));
    }

    #[tokio::test]
    async fn resolves_pulls_then_reads() {
        let (manager, _) = created(runtime_with(NGINX, AAA)).await;

        assert_eq!(
            manager.runtime().calls(),
            vec![
                Call::Resolve(NGINX.to_string()),
                Call::Pull(pinned(AAA)),
                Call::Resolve(NGINX.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn keeps_triggers_and_labels() {
        let manager = TagManager::new(runtime_with(NGINX, AAA));
        let spec = TagSpec::new(NGINX)
            .unwrap()
            .trigger("v1")
            .label("team", "web");

        let state = manager.create(spec).await.unwrap();

        assert!(state.pull_triggers.contains("v1"));
        assert_eq!(state.labels.len(), 1);
    }

    #[tokio::test]
    async fn explicit_tag_is_kept_in_pull_reference() {
        let manager = TagManager::new(runtime_with("nginx:1.25", AAA));

        let state = manager.create(TagSpec::new("nginx:1.25").unwrap()).await.unwrap();

        assert_eq!(state.full_image_name, "nginx:1.25@sha256:aaa");
        assert_eq!(manager.runtime().pulls(), vec!["nginx:1.25@sha256:aaa"]);
    }

    #[tokio::test]
    async fn unknown_name_fails_without_pulling() {
        let manager = TagManager::new(InMemoryRuntime::new());

        let err = manager.create(TagSpec::new(NGINX).unwrap()).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Resolution);
        assert!(err.is_not_found());
        assert!(manager.runtime().pulls().is_empty());
    }

    #[tokio::test]
    async fn resolution_failure_is_surfaced() {
        let runtime = runtime_with(NGINX, AAA);
        runtime.fail_resolve(NGINX, "registry timed out");
        let manager = TagManager::new(runtime);

        let err = manager.create(TagSpec::new(NGINX).unwrap()).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Resolution);
        assert!(err.to_string().contains(NGINX));
        assert!(err.to_string().contains("registry timed out"));
    }

    #[tokio::test]
    async fn pull_failure_records_nothing() {
        let runtime = runtime_with(NGINX, AAA);
        runtime.fail_pull(&pinned(AAA));
        let manager = TagManager::new(runtime);

        let err = manager.create(TagSpec::new(NGINX).unwrap()).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Pull);
        assert!(err.to_string().contains(&pinned(AAA)));
        assert!(manager.runtime().local_images().is_empty());
    }
}

// =============================================================================
// Read
// =============================================================================

mod read {
    use super::*;

    #[tokio::test]
    async fn is_idempotent() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;

        manager.read(&mut state).await.unwrap();
        let first = state.clone();
        manager.read(&mut state).await.unwrap();

        assert_eq!(state, first);
    }

    #[tokio::test]
    async fn refreshes_latest_but_not_managed_list() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;

        advance(&manager, &mut state, BBB).await;

        assert_eq!(state.latest.as_str(), BBB);
        assert_eq!(state.full_image_name, "library/nginx@sha256:bbb");
        assert_eq!(digests(&state), vec![AAA]);
        assert_eq!(manager.runtime().pulls().len(), 1, "read must not pull");
    }

    #[tokio::test]
    async fn missing_name_clears_identifier() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        manager.runtime().unpublish(NGINX);

        manager
            .read(&mut state)
            .await
            .expect("not-found must not be an error");

        assert!(!state.exists());
        assert_eq!(digests(&state), vec![AAA]);
    }

    #[tokio::test]
    async fn other_failures_are_surfaced() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        manager.runtime().fail_resolve(NGINX, "connection reset");

        let err = manager.read(&mut state).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Resolution);
        assert!(!err.is_not_found());
        assert!(state.exists());
    }
}

// =============================================================================
// Update
// =============================================================================

mod update {
    use super::*;

    #[tokio::test]
    async fn pulls_new_digest_and_prunes_old() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;

        let report = manager.update(&mut state).await.expect("update should succeed");

        assert_eq!(digests(&state), vec![BBB, AAA]);
        assert_eq!(state.latest.as_str(), BBB);
        assert_eq!(state.full_image_name, "library/nginx@sha256:bbb");
        assert_eq!(report.removed, vec![Digest::parse(AAA).unwrap()]);
        assert!(manager.runtime().has_image(&pinned(BBB)));
        assert!(!manager.runtime().has_image(&pinned(AAA)));
    }

    #[tokio::test]
    async fn unchanged_digest_still_pulls_and_keeps_duplicate() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        manager.read(&mut state).await.unwrap();
        manager.runtime().clear_calls();

        let report = manager.update(&mut state).await.unwrap();

        assert_eq!(manager.runtime().pulls(), vec![pinned(AAA)]);
        assert_eq!(digests(&state), vec![AAA, AAA]);
        assert!(report.is_empty());
        assert!(manager.runtime().removals().is_empty());
        assert!(manager.runtime().has_image(&pinned(AAA)));
    }

    #[tokio::test]
    async fn absent_stale_digest_is_skipped() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        manager.runtime().evict_image(&pinned(AAA));
        advance(&manager, &mut state, BBB).await;

        let report = manager.update(&mut state).await.expect("absence is not an error");

        assert_eq!(report.absent, vec![Digest::parse(AAA).unwrap()]);
        assert!(manager.runtime().removals().is_empty());
        assert_eq!(digests(&state), vec![BBB, AAA]);
    }

    #[tokio::test]
    async fn prunes_every_old_entry_in_stored_order() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.runtime().fail_remove(&pinned(AAA));
        assert!(manager.update(&mut state).await.is_err());
        assert_eq!(digests(&state), vec![BBB, AAA]);

        manager.runtime().clear_failures();
        manager.runtime().clear_calls();
        advance(&manager, &mut state, CCC).await;
        manager.update(&mut state).await.unwrap();

        assert_eq!(manager.runtime().removals(), vec![pinned(BBB), pinned(AAA)]);
        assert_eq!(digests(&state), vec![CCC, BBB]);
        assert_eq!(manager.runtime().local_images(), vec![pinned(CCC)]);
    }

    #[tokio::test]
    async fn first_removal_failure_stops_pruning() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.runtime().fail_remove(&pinned(AAA));
        assert!(manager.update(&mut state).await.is_err());
        assert_eq!(digests(&state), vec![BBB, AAA]);

        manager.runtime().clear_failures();
        manager.runtime().fail_remove(&pinned(BBB));
        manager.runtime().clear_calls();
        advance(&manager, &mut state, CCC).await;

        let err = manager.update(&mut state).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Removal);
        assert_eq!(manager.runtime().removals(), vec![pinned(BBB)]);
        assert_eq!(digests(&state), vec![CCC, BBB]);
        assert!(manager.runtime().has_image(&pinned(AAA)));
        assert!(manager.runtime().has_image(&pinned(BBB)));
    }

    #[tokio::test]
    async fn lists_local_images_once() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.runtime().clear_calls();

        manager.update(&mut state).await.unwrap();

        let lists = manager
            .runtime()
            .calls()
            .into_iter()
            .filter(|c| *c == Call::ListImages)
            .count();
        assert_eq!(lists, 1);
    }

    #[tokio::test]
    async fn pull_failure_leaves_state_untouched() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.runtime().fail_pull(&pinned(BBB));
        let before = state.clone();

        let err = manager.update(&mut state).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Pull);
        assert_eq!(state, before);
        assert!(manager.runtime().removals().is_empty());
        assert!(manager.runtime().has_image(&pinned(AAA)));
    }

    #[tokio::test]
    async fn removal_failure_still_advances_state() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.runtime().fail_remove(&pinned(AAA));

        let err = manager.update(&mut state).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Removal);
        assert!(err.to_string().contains(&pinned(AAA)));
        assert_eq!(digests(&state), vec![BBB, AAA]);
        assert_eq!(state.full_image_name, "library/nginx@sha256:bbb");
        assert!(manager.runtime().has_image(&pinned(BBB)));
    }

    #[tokio::test]
    async fn retry_after_removal_failure_prunes_survivor() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.runtime().fail_remove(&pinned(AAA));
        assert!(manager.update(&mut state).await.is_err());

        manager.runtime().clear_failures();
        manager.read(&mut state).await.unwrap();
        manager.update(&mut state).await.unwrap();

        assert!(!manager.runtime().has_image(&pinned(AAA)));
        assert_eq!(digests(&state), vec![BBB, BBB]);
    }

    #[tokio::test]
    async fn listing_failure_counts_as_removal_error() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.runtime().fail_list();

        let err = manager.update(&mut state).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Removal);
        assert_eq!(digests(&state), vec![BBB, AAA]);
    }

    #[tokio::test]
    async fn requires_identifier() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        state.id = None;

        let err = manager.update(&mut state).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::NotCreated);
    }
}

// =============================================================================
// Delete
// =============================================================================

mod delete {
    use super::*;

    #[tokio::test]
    async fn removes_every_managed_digest() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        advance(&manager, &mut state, BBB).await;
        manager.update(&mut state).await.unwrap();
        // Pulled again out of band
        manager.runtime().insert_image(&pinned(AAA));
        manager.runtime().clear_calls();

        let report = manager.delete(&mut state).await.expect("delete should succeed");

        assert!(!state.exists());
        assert_eq!(report.removed.len(), 2);
        assert_eq!(manager.runtime().removals(), vec![pinned(BBB), pinned(AAA)]);
        assert!(manager.runtime().local_images().is_empty());
    }

    #[tokio::test]
    async fn clears_identifier_when_images_already_gone() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        manager.runtime().evict_image(&pinned(AAA));

        let report = manager.delete(&mut state).await.unwrap();

        assert!(!state.exists());
        assert_eq!(report.absent.len(), 1);
        assert!(manager.runtime().removals().is_empty());
    }

    #[tokio::test]
    async fn removal_failure_keeps_identifier() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        manager.runtime().fail_remove(&pinned(AAA));

        let err = manager.delete(&mut state).await.unwrap_err();

        assert_eq!(err.kind(), TagErrorKind::Removal);
        assert!(state.exists());

        manager.runtime().clear_failures();
        manager.delete(&mut state).await.expect("retry should succeed");
        assert!(!state.exists());
    }

    #[tokio::test]
    async fn duplicate_entries_are_removed_once() {
        let (manager, mut state) = created(runtime_with(NGINX, AAA)).await;
        manager.read(&mut state).await.unwrap();
        manager.update(&mut state).await.unwrap();
        assert_eq!(digests(&state), vec![AAA, AAA]);
        manager.runtime().clear_calls();

        manager.delete(&mut state).await.unwrap();

        assert_eq!(manager.runtime().removals(), vec![pinned(AAA)]);
    }
}
