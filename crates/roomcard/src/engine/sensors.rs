//! Sensor Aggregator: classifies snapshot sensors for automatic rollup
//! and partitions them into averaged groups and individual sensors.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use tracing::trace;

use crate::config::EntityConfig;
use crate::config::Feature;
use crate::config::RoomConfig;
use crate::ha::domains;
use crate::ha::AreaRegistryEntry;
use crate::ha::EntityState;
use crate::ha::Registries;
use crate::ha::Snapshot;

use super::EntityInformation;

/// The allowed device classes for automatic aggregation: the host's
/// numeric taxonomy intersected with the configured classes. No
/// configured classes means every numeric class is allowed.
pub fn allowed_sensor_classes(config: &RoomConfig, numeric_classes: &[String]) -> Vec<String> {
    if config.sensor_classes.is_empty() {
        return numeric_classes.to_vec();
    }
    numeric_classes
        .iter()
        .filter(|class| config.sensor_classes.contains(class))
        .cloned()
        .collect()
}

/// Eligibility of a sensor for automatic aggregation.
///
/// Requires the sensor domain, the `exclude_default_entities` feature to
/// be unset, and a device class from the allowed set. Where the area
/// registers a canonical default sensor for that class, only the default
/// is eligible, which keeps every ambient sensor in a room from being
/// silently pulled into the rollup. The check is per device class: a
/// class without an area default is unrestricted.
pub fn classify(
    state: &EntityState,
    config: &RoomConfig,
    area: Option<&AreaRegistryEntry>,
    allowed_classes: &[String],
) -> bool {
    if state.domain() != domains::DOMAIN_SENSOR {
        return false;
    }
    if config.has_feature(Feature::ExcludeDefaultEntities) {
        return false;
    }
    let Some(device_class) = state.attribute_str("device_class") else {
        return false;
    };
    if !allowed_classes.iter().any(|c| c == device_class) {
        return false;
    }
    if let Some(default_id) = area.and_then(|a| a.default_sensor(device_class)) {
        if default_id != state.entity_id {
            trace!(
                entity_id = %state.entity_id,
                device_class,
                default_id,
                "sensor excluded by default-sensor exclusivity"
            );
            return false;
        }
    }
    true
}

/// One automatically-aggregated group of sensors sharing a device class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorGroup {
    pub device_class: String,

    /// Member states, ordered by entity id.
    pub states: Vec<EntityState>,

    /// Mean of the numeric members sharing the group's unit.
    pub average: Option<f64>,

    /// Unit of the first member carrying one.
    pub unit: Option<String>,
}

impl SensorGroup {
    /// Render-ready reading, e.g. "21.5 °C". One decimal at most.
    pub fn display(&self) -> Option<String> {
        let average = self.average?;
        let rounded = (average * 10.0).round() / 10.0;
        let number = if rounded.fract() == 0.0 {
            format!("{rounded:.0}")
        } else {
            format!("{rounded:.1}")
        };
        Some(match &self.unit {
            Some(unit) => format!("{number} {unit}"),
            None => number,
        })
    }
}

/// Sensor portion of the view model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorFragment {
    /// One group per device class, alphabetical by class.
    pub averaged: Vec<SensorGroup>,

    /// Explicitly configured sensors, shown standalone in declaration
    /// order regardless of device class.
    pub individual: Vec<EntityInformation>,
}

/// Partition the room's sensors.
///
/// Automatic aggregation considers every snapshot sensor owned by the
/// configured area (directly or via its device); explicitly configured
/// sensors are looked up by id and never averaged.
pub fn group_sensors(
    config: &RoomConfig,
    snapshot: &Snapshot,
    registries: &Registries,
    allowed_classes: &[String],
) -> SensorFragment {
    let area = registries.area(&config.area);

    let mut eligible: Vec<&EntityState> = snapshot
        .iter()
        .filter(|state| registries.area_of_entity(&state.entity_id) == Some(config.area.as_str()))
        .filter(|state| classify(state, config, area, allowed_classes))
        .collect();
    // Snapshot iteration order is arbitrary; sort so identical snapshots
    // produce identical fragments for the update gate.
    eligible.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));

    let mut groups: BTreeMap<String, Vec<EntityState>> = BTreeMap::new();
    for state in eligible {
        let device_class = state
            .attribute_str("device_class")
            .unwrap_or_default()
            .to_string();
        groups.entry(device_class).or_default().push(state.clone());
    }

    let averaged = groups
        .into_iter()
        .map(|(device_class, states)| build_group(device_class, states))
        .collect();

    let sticky = config.has_feature(Feature::StickyEntities);
    let individual = config
        .sensors
        .iter()
        .filter_map(|id| match snapshot.get(id) {
            Some(state) => Some(EntityInformation {
                config: EntityConfig::bare(id.clone()),
                state: Some(state.clone()),
            }),
            None if sticky => Some(EntityInformation {
                config: EntityConfig::bare(id.clone()),
                state: Some(EntityState::placeholder(id.clone())),
            }),
            None => None,
        })
        .collect();

    SensorFragment {
        averaged,
        individual,
    }
}

fn build_group(device_class: String, states: Vec<EntityState>) -> SensorGroup {
    let unit = states
        .iter()
        .find_map(|s| s.attribute_str("unit_of_measurement"))
        .map(str::to_string);

    // Mixed-unit members are displayed but excluded from the average.
    let values: Vec<f64> = states
        .iter()
        .filter(|s| s.attribute_str("unit_of_measurement").map(str::to_string) == unit)
        .filter_map(EntityState::numeric_state)
        .collect();

    let average = if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    };

    SensorGroup {
        device_class,
        states,
        average,
        unit,
    }
}
