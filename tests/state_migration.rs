// ABOUTME: Integration tests for persisted state: the file store and schema upgrades.
// ABOUTME: Schema 0 documents with map-shaped labels must load as schema 1 state.

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use tagkeep::secret::SecretState;
use tagkeep::state::{SCHEMA_VERSION, StateError, StateStore, StoredResource, upgrade_labels};
use tagkeep::tag::TagState;
use tagkeep::types::Label;

fn write_raw(path: std::path::PathBuf, json: serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
}

mod upgrade {
    use super::*;

    #[test]
    fn schema_0_secret_labels_become_pairs() {
        let temp = tempfile::tempdir().unwrap();
        let store = StateStore::new(temp.path());
        write_raw(
            store.path::<SecretState>("db-password"),
            serde_json::json!({
                "kind": "secret",
                "state": {
                    "id": "abc123",
                    "name": "db-password",
                    "data": "aHVudGVyMg==",
                    "labels": { "app": "web", "tier": "db" }
                }
            }),
        );

        let state: SecretState = store.load("db-password").unwrap().unwrap();

        let labels: Vec<&Label> = state.labels.iter().collect();
        assert_eq!(
            labels,
            vec![&Label::new("app", "web"), &Label::new("tier", "db")]
        );
        assert_eq!(state.data.as_bytes(), b"hunter2");
        assert!(state.exists());
    }

    #[test]
    fn schema_0_tag_loads_and_rewrites_as_current() {
        let temp = tempfile::tempdir().unwrap();
        let store = StateStore::new(temp.path());
        write_raw(
            store.path::<TagState>("library/nginx"),
            serde_json::json!({
                "schema_version": 0,
                "kind": "tag",
                "state": {
                    "id": "library/nginx",
                    "name": "library/nginx",
                    "pull_triggers": ["v1"],
                    "labels": { "team": "web" },
                    "latest": "sha256:bbb",
                    "full_image_name": "library/nginx@sha256:bbb",
                    "all": ["sha256:bbb", "sha256:aaa"]
                }
            }),
        );

        let state: TagState = store.load("library/nginx").unwrap().unwrap();
        assert_eq!(state.all.len(), 2);
        assert_eq!(state.labels.len(), 1);

        let path = store.save("library/nginx", &state).unwrap();
        let stored: StoredResource =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(stored.schema_version, SCHEMA_VERSION);
        assert!(stored.written_at.is_some());
        assert_eq!(
            stored.state["labels"],
            serde_json::json!([{ "label": "team", "value": "web" }])
        );
    }

    #[test]
    fn newer_schema_is_rejected() {
        let stored = StoredResource {
            schema_version: SCHEMA_VERSION + 1,
            kind: "tag".to_string(),
            written_at: None,
            state: serde_json::json!({}),
        };

        let err = stored.decode::<TagState>().unwrap_err();
        assert!(matches!(err, StateError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let stored = StoredResource {
            schema_version: SCHEMA_VERSION,
            kind: "secret".to_string(),
            written_at: None,
            state: serde_json::json!({}),
        };

        let err = stored.decode::<TagState>().unwrap_err();
        assert!(matches!(err, StateError::KindMismatch { .. }));
    }

    #[test]
    fn schema_1_rejects_empty_digest_list() {
        let stored = StoredResource {
            schema_version: SCHEMA_VERSION,
            kind: "tag".to_string(),
            written_at: None,
            state: serde_json::json!({
                "name": "library/nginx",
                "latest": "sha256:aaa",
                "full_image_name": "library/nginx@sha256:aaa",
                "all": []
            }),
        };

        assert!(stored.decode::<TagState>().is_err());
    }

    proptest! {
        #[test]
        fn upgrade_keeps_every_label(map in prop::collection::btree_map("[a-z.]{1,12}", "[ -~]{0,16}", 0..8)) {
            let labels = upgrade_labels(map.clone());

            prop_assert_eq!(labels.len(), map.len());
            prop_assert_eq!(labels.to_map().into_iter().collect::<BTreeMap<_, _>>(), map);
        }
    }
}

mod store {
    use super::*;

    #[test]
    fn missing_state_is_none() {
        let temp = tempfile::tempdir().unwrap();
        let store = StateStore::new(temp.path());

        assert!(store.load::<TagState>("library/nginx").unwrap().is_none());
    }

    #[test]
    fn malformed_file_names_its_path() {
        let temp = tempfile::tempdir().unwrap();
        let store = StateStore::new(temp.path());
        let path = store.path::<TagState>("library/nginx");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let err = store.load::<TagState>("library/nginx").unwrap_err();

        assert!(matches!(err, StateError::Malformed { .. }));
        assert!(err.to_string().contains("library_nginx.json"));
    }

    #[test]
    fn remove_tolerates_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let store = StateStore::new(temp.path());

        store.remove::<SecretState>("never-saved").unwrap();
    }

    #[test]
    fn kinds_are_kept_apart() {
        let store = StateStore::new("/state");

        assert_ne!(
            store.path::<TagState>("x"),
            store.path::<SecretState>("x")
        );
    }
}
