// ABOUTME: Tag command handlers: apply, refresh, destroy, show.
// ABOUTME: Picks the lifecycle operation from stored state and persists what it returns.

use crate::error::{Error, Result};
use crate::output::Output;
use crate::runtime::{DigestResolver, ImageOps};
use crate::state::StateStore;
use crate::tag::{TagErrorKind, TagManager, TagPlan, TagSpec, TagState, plan};

fn load(store: &StateStore, name: &str) -> Result<TagState> {
    store
        .load::<TagState>(name)?
        .ok_or_else(|| Error::NotTracked {
            kind: "tag",
            name: name.to_string(),
        })
}

/// Bring the tag described by `spec` up to date.
///
/// Creates it when nothing is stored. Otherwise refreshes it, and updates
/// when the pull triggers changed or `force` is set.
pub async fn apply_tag<R>(
    manager: &TagManager<R>,
    store: &StateStore,
    spec: TagSpec,
    force: bool,
    output: &Output,
) -> Result<TagState>
where
    R: DigestResolver + ImageOps,
{
    let key = spec.name.to_string();
    let mut existing = store.load::<TagState>(&key)?;

    if let Some(state) = &existing
        && state.name != spec.name
    {
        return Err(Error::InvalidConfig(format!(
            "state stored for {} belongs to {}",
            spec.name, state.name
        )));
    }

    if let Some(state) = existing.as_mut().filter(|s| s.exists()) {
        output.progress(&format!("  → Refreshing {}...", state.name));
        manager.read(state).await?;
        if !state.exists() {
            output.warning(&format!("{} is no longer in the registry", state.name));
            store.save(&key, &*state)?;
        }
    }

    match plan(existing.as_ref(), &spec, force) {
        TagPlan::Create => {
            output.progress(&format!("  → Pulling {}...", spec.name));
            let state = manager.create(spec).await?;
            store.save(&key, &state)?;
            output.success(&format!("Tracking {}", state.full_image_name));
            Ok(state)
        }
        TagPlan::Update => {
            let before = existing.ok_or_else(|| Error::NotTracked {
                kind: "tag",
                name: key.clone(),
            })?;
            let mut state = before.clone();
            state.pull_triggers = spec.pull_triggers;
            state.labels = spec.labels;

            output.progress(&format!("  → Pulling {}...", state.full_image_name));
            match manager.update(&mut state).await {
                Ok(report) => {
                    store.save(&key, &state)?;
                    output.success(&format!(
                        "Tracking {} (pruned {})",
                        state.full_image_name,
                        report.removed.len()
                    ));
                    Ok(state)
                }
                // The new digest was pulled; keep the advanced state so the
                // next run retries pruning.
                Err(e) if e.kind() == TagErrorKind::Removal => {
                    store.save(&key, &state)?;
                    Err(e.into())
                }
                Err(e) => {
                    store.save(&key, &before)?;
                    Err(e.into())
                }
            }
        }
        TagPlan::Refresh => {
            let state = existing.ok_or_else(|| Error::NotTracked {
                kind: "tag",
                name: key.clone(),
            })?;
            store.save(&key, &state)?;
            output.success(&format!("Up to date: {}", state.full_image_name));
            Ok(state)
        }
    }
}

/// Re-resolve a tracked tag without pulling or pruning.
pub async fn refresh_tag<R>(
    manager: &TagManager<R>,
    store: &StateStore,
    name: &str,
    output: &Output,
) -> Result<TagState>
where
    R: DigestResolver + ImageOps,
{
    let mut state = load(store, name)?;
    manager.read(&mut state).await?;
    store.save(name, &state)?;

    if state.exists() {
        output.success(&format!("{} resolves to {}", state.name, state.latest));
    } else {
        output.warning(&format!("{} is no longer in the registry", state.name));
    }
    Ok(state)
}

/// Remove every image a tracked tag pulled and forget it.
pub async fn destroy_tag<R>(
    manager: &TagManager<R>,
    store: &StateStore,
    name: &str,
    output: &Output,
) -> Result<()>
where
    R: DigestResolver + ImageOps,
{
    let mut state = load(store, name)?;

    output.progress(&format!("  → Removing {} image(s)...", state.all.len()));
    let report = manager.delete(&mut state).await?;
    store.remove::<TagState>(name)?;

    output.success(&format!(
        "Released {} ({} removed, {} already absent)",
        name,
        report.removed.len(),
        report.absent.len()
    ));
    Ok(())
}

/// Print the stored state of a tag.
pub fn show_tag(store: &StateStore, name: &str, output: &Output) -> Result<TagState> {
    let state = load(store, name)?;
    output.state(&state);
    Ok(state)
}
