//! Problem, occupancy and mold indicator derivations, plus the legacy
//! climate threshold check.

use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::config::Feature;
use crate::config::OccupancyConfig;
use crate::config::OccupancyStyle;
use crate::config::RoomConfig;
use crate::ha::domains;
use crate::ha::domains::coerce_numeric;
use crate::ha::EntityState;
use crate::ha::Registries;
use crate::ha::Snapshot;

/// Label marking an entity (or its device) as a problem source.
pub const PROBLEM_LABEL: &str = "problem";

/// Entities that qualify as problem entities for an area: tagged with the
/// problem label (on the entity or its owning device) and belonging to
/// the area, directly or via the device. Sorted by id for stable output.
pub fn problem_entities(registries: &Registries, area_id: &str) -> Vec<String> {
    let mut ids: Vec<String> = registries
        .entities()
        .filter(|entry| {
            let device = entry.device_id.as_deref().and_then(|d| registries.device(d));
            let labeled = entry.has_label(PROBLEM_LABEL)
                || device.is_some_and(|d| d.has_label(PROBLEM_LABEL));
            if !labeled {
                return false;
            }
            entry.area_id.as_deref() == Some(area_id)
                || device.is_some_and(|d| d.area_id.as_deref() == Some(area_id))
        })
        .map(|entry| entry.entity_id.clone())
        .collect();
    ids.sort();
    ids
}

/// Whether any of the given problem entities is currently in a state the
/// domain heuristic considers concerning.
pub fn any_problem_active(snapshot: &Snapshot, entity_ids: &[String]) -> bool {
    entity_ids
        .iter()
        .filter_map(|id| snapshot.get(id))
        .any(|state| domains::is_active_state(state.domain(), &state.state))
}

/// When the problem indicator is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemDisplayPolicy {
    /// Show whenever any problem entity exists.
    #[default]
    Always,
    /// Show only while a problem entity is active.
    ActiveOnly,
}

/// Pure display-policy function over the fragment's count and active flag.
pub fn problems_visible(policy: ProblemDisplayPolicy, count: usize, any_active: bool) -> bool {
    match policy {
        ProblemDisplayPolicy::Always => count > 0,
        ProblemDisplayPolicy::ActiveOnly => any_active,
    }
}

/// Whether any configured presence/motion/occupancy entity is active.
/// An absent config or an empty entity list is simply unoccupied, not an
/// error.
pub fn occupancy_active(snapshot: &Snapshot, config: Option<&OccupancyConfig>) -> bool {
    let Some(config) = config else {
        return false;
    };
    config
        .entities
        .iter()
        .filter_map(|id| snapshot.get(id))
        .any(|state| domains::is_active_state(state.domain(), &state.state))
}

/// Named visual parameters for the occupied state.
///
/// Each disable flag independently removes its parameter pair; disabling
/// all four yields an empty set. Inactive rooms get no parameters at all.
pub fn occupancy_style_params(
    active: bool,
    config: Option<&OccupancyConfig>,
) -> Vec<(&'static str, &'static str)> {
    if !active {
        return Vec::new();
    }
    let disabled = |style: OccupancyStyle| {
        config.is_some_and(|c| c.disabled_styles.contains(&style))
    };

    let mut params = Vec::new();
    if !disabled(OccupancyStyle::CardBorder) {
        params.push(("border-width", "2px"));
        params.push(("border-color", "var(--occupancy-color)"));
    }
    if !disabled(OccupancyStyle::CardAnimation) {
        params.push(("card-animation-name", "occupancy-pulse"));
        params.push(("card-animation-duration", "3s"));
    }
    if !disabled(OccupancyStyle::IconColor) {
        params.push(("icon-color", "var(--occupancy-color)"));
        params.push(("icon-background", "var(--occupancy-background)"));
    }
    if !disabled(OccupancyStyle::IconAnimation) {
        params.push(("icon-animation-name", "occupancy-breathe"));
        params.push(("icon-animation-duration", "4s"));
    }
    params
}

/// Mold indicator visibility for a raw sensor value.
///
/// No configured threshold is default-permissive: any numeric reading
/// shows the indicator. Non-numeric readings never do.
pub fn mold_visible(value: &str, threshold: Option<f64>) -> bool {
    let Some(value) = coerce_numeric(value) else {
        return false;
    };
    match threshold {
        None => true,
        Some(threshold) => value >= threshold,
    }
}

/// Mold indicator for a room: reads the configured mold sensor from the
/// snapshot and applies `mold_visible`.
pub fn mold_indicator(snapshot: &Snapshot, config: &RoomConfig) -> bool {
    let Some(thresholds) = &config.thresholds else {
        return false;
    };
    let Some(entity_id) = &thresholds.mold_entity else {
        return false;
    };
    let Some(state) = snapshot.get(entity_id) else {
        return false;
    };
    mold_visible(&state.state, thresholds.mold)
}

/// Sensor kind for the legacy climate threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateKind {
    Temperature,
    Humidity,
}

impl ClimateKind {
    /// Per-sensor attribute that can embed a threshold override.
    fn threshold_attribute(self) -> &'static str {
        match self {
            Self::Temperature => "temperature_threshold",
            Self::Humidity => "humidity_threshold",
        }
    }

    fn default_threshold(self) -> f64 {
        match self {
            Self::Temperature => 80.0,
            Self::Humidity => 60.0,
        }
    }
}

/// Legacy climate styling check: strict greater-than against the sensor's
/// embedded threshold or the hardcoded default.
///
/// This predates the configurable rule engine and intentionally keeps its
/// own comparison policy (`>`, not `>=`); the two are not unified.
/// Disabled entirely under `skip_climate_styles`.
pub fn legacy_climate_exceeded(state: &EntityState, kind: ClimateKind, config: &RoomConfig) -> bool {
    if config.has_feature(Feature::SkipClimateStyles) {
        return false;
    }
    let Some(value) = state.numeric_state() else {
        return false;
    };
    let threshold = state
        .attribute(kind.threshold_attribute())
        .and_then(serde_json::Value::as_f64)
        .unwrap_or_else(|| kind.default_threshold());
    let exceeded = value > threshold;
    if exceeded {
        trace!(entity_id = %state.entity_id, value, threshold, "legacy climate threshold exceeded");
    }
    exceeded
}
