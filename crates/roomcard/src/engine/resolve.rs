//! Entity Resolver: builds the canonical display list from config plus
//! snapshot, and resolves the main entity.

use tracing::debug;

use crate::config::ActionConfig;
use crate::config::EntityConfig;
use crate::config::Feature;
use crate::config::RoomConfig;
use crate::ha::domains;
use crate::ha::EntityState;
use crate::ha::Registries;
use crate::ha::Snapshot;

use super::EntityInformation;

/// Fixed climate mode → icon table, keyed by the entity's current state.
fn climate_mode_icon(state: &str) -> Option<&'static str> {
    match state {
        "heat" => Some("mdi:fire"),
        "cool" => Some("mdi:snowflake"),
        "heat_cool" => Some("mdi:sun-snowflake-variant"),
        "auto" => Some("mdi:autorenew"),
        "dry" => Some("mdi:water-percent"),
        "fan_only" => Some("mdi:fan"),
        "off" => Some("mdi:power"),
        _ => None,
    }
}

/// Default interaction actions, merged under any user overrides.
/// Each action defaults independently; a user override always wins.
fn merge_default_actions(config: &mut EntityConfig) {
    config.tap_action.get_or_insert(ActionConfig::Toggle);
    config.hold_action.get_or_insert(ActionConfig::MoreInfo);
    config.double_tap_action.get_or_insert(ActionConfig::None);
}

/// Resolve the auxiliary entity list for a room.
///
/// Base entities (the conventional area light and fan) come first in
/// their fixed order, followed by configured entities in declaration
/// order. Duplicate ids are kept as-is; deduplication is deliberately
/// not performed.
pub fn resolve_entities(
    config: &RoomConfig,
    snapshot: &Snapshot,
    registries: &Registries,
) -> Vec<EntityInformation> {
    let mut candidates = Vec::new();

    if !config.has_feature(Feature::ExcludeDefaultEntities) {
        candidates.push(EntityConfig::bare(domains::area_light_id(&config.area)));
        candidates.push(EntityConfig::bare(domains::area_fan_id(&config.area)));
    }
    candidates.extend(config.entities.iter().cloned().map(|r| r.into_config()));

    let hide_hidden = config.has_feature(Feature::HideHiddenEntities);
    let sticky = config.has_feature(Feature::StickyEntities);

    let mut resolved = Vec::new();
    for entity_config in candidates {
        if hide_hidden && registries.is_hidden(&entity_config.entity_id) {
            debug!(entity_id = %entity_config.entity_id, "dropping hidden entity");
            continue;
        }
        match snapshot.get(&entity_config.entity_id) {
            Some(state) => {
                resolved.push(build_entity(entity_config, state.clone(), config));
            }
            None if sticky => {
                // Placeholder keeps its slot but gets no default actions;
                // actions only attach when a real state exists.
                let placeholder = EntityState::placeholder(entity_config.entity_id.as_str());
                resolved.push(EntityInformation {
                    config: entity_config,
                    state: Some(placeholder),
                });
            }
            None => {
                debug!(entity_id = %entity_config.entity_id, "dropping missing entity");
            }
        }
    }
    resolved
}

/// Attach a live state to an entity config: merge default actions and
/// run domain-conditional icon inference.
fn build_entity(
    mut entity_config: EntityConfig,
    state: EntityState,
    room: &RoomConfig,
) -> EntityInformation {
    merge_default_actions(&mut entity_config);

    if state.domain() == domains::DOMAIN_CLIMATE
        && !room.has_feature(Feature::SkipClimateStyles)
        && entity_config.icon.is_none()
        && state.attribute("icon").is_none()
    {
        if let Some(icon) = climate_mode_icon(&state.state) {
            entity_config.icon = Some(icon.to_string());
        }
    }

    EntityInformation {
        config: entity_config,
        state: Some(state),
    }
}

/// Resolve the main entity.
///
/// An explicit config wins; otherwise the conventional area light is
/// synthesized with a default navigate tap whose target is the area id
/// with underscores replaced by dashes (or the configured override).
/// The main position must always render something, so a missing id gets
/// a placeholder state rather than being dropped.
pub fn resolve_main_entity(config: &RoomConfig, snapshot: &Snapshot) -> EntityInformation {
    let mut entity_config = match &config.entity {
        Some(entity_ref) => entity_ref.clone().into_config(),
        None => {
            let mut synthesized = EntityConfig::bare(domains::area_light_id(&config.area));
            let path = config
                .navigate
                .clone()
                .unwrap_or_else(|| format!("/{}", config.area.replace('_', "-")));
            synthesized.tap_action = Some(ActionConfig::navigate(path));
            synthesized
        }
    };
    merge_default_actions(&mut entity_config);

    let state = snapshot
        .get(&entity_config.entity_id)
        .cloned()
        .unwrap_or_else(|| EntityState::placeholder(&entity_config.entity_id));

    EntityInformation {
        config: entity_config,
        state: Some(state),
    }
}
