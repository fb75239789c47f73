//! Desktop runtime persistence adapters for icon layout hydration and saves.

use std::collections::HashMap;

use desktop_app_contract::AppIcon;
use platform_host::IconLayoutStore;

use crate::grid::{next_available_position, GridItem, GridPosition};

/// Merges a saved icon list with the current default icon set.
///
/// Saved position, non-empty title, and color win for ids the defaults know. Saved icons the
/// defaults do not know are kept as-is. Defaults missing from the save are appended at the next
/// available positions.
pub fn merge_with_defaults(saved: Vec<AppIcon>, defaults: &[AppIcon]) -> Vec<AppIcon> {
    let by_id: HashMap<&str, &AppIcon> = defaults.iter().map(|icon| (icon.id.as_str(), icon)).collect();

    let mut merged: Vec<AppIcon> = saved
        .into_iter()
        .map(|saved| match by_id.get(saved.id.as_str()) {
            Some(default) => AppIcon {
                x: saved.x,
                y: saved.y,
                title: if saved.title.trim().is_empty() {
                    default.title.clone()
                } else {
                    saved.title
                },
                color: saved.color.or_else(|| default.color.clone()),
                ..(*default).clone()
            },
            None => saved,
        })
        .collect();

    for default in defaults {
        if merged.iter().any(|icon| icon.id == default.id) {
            continue;
        }
        let items: Vec<GridItem> = merged
            .iter()
            .map(|icon| GridItem {
                id: icon.id.clone(),
                position: GridPosition::clamped(i64::from(icon.x), i64::from(icon.y), u32::MAX),
            })
            .collect();
        let position = next_available_position(&items);
        let mut icon = default.clone();
        icon.x = position.col as i32;
        icon.y = position.row as i32;
        merged.push(icon);
    }
    merged
}

/// Loads the saved icon layout and merges it with `defaults`.
///
/// Missing, empty, or unreadable layouts fall back to `defaults`.
pub async fn load_icon_layout<S>(store: &S, defaults: &[AppIcon]) -> Vec<AppIcon>
where
    S: IconLayoutStore + ?Sized,
{
    match store.load().await {
        Ok(Some(saved)) if !saved.is_empty() => merge_with_defaults(saved, defaults),
        Ok(_) => defaults.to_vec(),
        Err(err) => {
            leptos::logging::warn!("icon layout load failed: {err}");
            defaults.to_vec()
        }
    }
}

/// Persists the icon layout through the injected store.
pub async fn persist_icon_layout<S>(store: &S, icons: &[AppIcon]) -> Result<(), String>
where
    S: IconLayoutStore + ?Sized,
{
    store.save(icons).await
}
