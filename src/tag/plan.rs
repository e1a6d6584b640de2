// ABOUTME: Decides which lifecycle operation brings stored state in line with a spec.
// ABOUTME: Trigger comparison lives here, outside the manager.

use super::state::{TagSpec, TagState};

/// The operation needed to converge a tag resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPlan {
    /// No stored state, or the stored resource is gone.
    Create,
    /// Pull triggers changed since the last reconciliation.
    Update,
    /// Nothing to do beyond refreshing computed fields.
    Refresh,
}

/// Compare stored state against the declared spec.
///
/// The stored state is the one kept under `spec.name`; callers look it up
/// by name. `force` turns a refresh into an update, for drift noticed out
/// of band.
pub fn plan(state: Option<&TagState>, spec: &TagSpec, force: bool) -> TagPlan {
    match state {
        None => TagPlan::Create,
        Some(state) if !state.exists() => TagPlan::Create,
        Some(state) if force || state.pull_triggers != spec.pull_triggers => TagPlan::Update,
        Some(_) => TagPlan::Refresh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Digest, TagId, TagName};
    use nonempty::nonempty;
    use std::collections::BTreeSet;

    fn spec(triggers: &[&str]) -> TagSpec {
        TagSpec {
            name: TagName::parse("nginx").unwrap(),
            pull_triggers: triggers.iter().map(|t| t.to_string()).collect(),
            labels: Default::default(),
        }
    }

    fn stored(triggers: &[&str]) -> TagState {
        let name = TagName::parse("nginx").unwrap();
        let digest = Digest::parse("sha256:aaa").unwrap();
        TagState {
            id: Some(TagId::from(&name)),
            full_image_name: name.full_image_name(&digest),
            name,
            pull_triggers: triggers.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            labels: Default::default(),
            latest: digest.clone(),
            all: nonempty![digest],
        }
    }

    #[test]
    fn nothing_stored_creates() {
        assert_eq!(plan(None, &spec(&[]), false), TagPlan::Create);
    }

    #[test]
    fn vanished_resource_is_recreated() {
        let mut state = stored(&["v1"]);
        state.id = None;
        assert_eq!(plan(Some(&state), &spec(&["v1"]), false), TagPlan::Create);
    }

    #[test]
    fn changed_triggers_update() {
        let state = stored(&["v1"]);
        assert_eq!(plan(Some(&state), &spec(&["v2"]), false), TagPlan::Update);
    }

    #[test]
    fn unchanged_triggers_refresh_unless_forced() {
        let state = stored(&["v1"]);
        assert_eq!(plan(Some(&state), &spec(&["v1"]), false), TagPlan::Refresh);
        assert_eq!(plan(Some(&state), &spec(&["v1"]), true), TagPlan::Update);
    }
}
