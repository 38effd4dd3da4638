//! Snapshot and registry data model.
//!
//! The host platform polls every device in the home and hands the engine a
//! full point-in-time snapshot of entity states, together with its
//! entity/device/area registries. Both are plain in-memory maps behind
//! narrow read-only accessors, so tests can build them directly with no
//! host dependency.

pub mod domains;

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// A single entity's live value in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Full entity id (`domain.object_id`).
    pub entity_id: String,

    /// Raw state string as reported by the host.
    pub state: String,

    /// Arbitrary host-supplied attributes.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: Map::new(),
        }
    }

    /// Synthesized stand-in for an entity the snapshot does not contain.
    ///
    /// Uses the host's own convention for an unreadable entity.
    pub fn placeholder(entity_id: impl Into<String>) -> Self {
        Self::new(entity_id, "unavailable")
    }

    /// Builder-style attribute insertion, mostly for tests and fakes.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    /// The entity's domain, derived from the id prefix.
    pub fn domain(&self) -> &str {
        domains::domain_of(&self.entity_id)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// String form of an attribute, if it has one.
    pub fn attribute_str(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(Value::as_str)
    }

    /// The value a rule targets: the bare state, or a named attribute
    /// rendered to text. A missing attribute is `None`, never an error.
    pub fn target_text(&self, attribute: Option<&str>) -> Option<String> {
        match attribute {
            None => Some(self.state.clone()),
            Some(name) => value_to_text(self.attributes.get(name)?),
        }
    }

    /// Numeric coercion of the bare state.
    pub fn numeric_state(&self) -> Option<f64> {
        domains::coerce_numeric(&self.state)
    }
}

/// Render an attribute value to comparison text. Containers and null do
/// not participate in rule matching.
fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Full point-in-time map of every entity's current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    entities: HashMap<String, EntityState>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: EntityState) {
        self.entities.insert(state.entity_id.clone(), state);
    }

    /// Look up an entity's live value. Absent entities are "missing".
    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.entities.contains_key(entity_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityState> {
        self.entities.values()
    }
}

impl FromIterator<EntityState> for Snapshot {
    fn from_iter<I: IntoIterator<Item = EntityState>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for state in iter {
            snapshot.insert(state);
        }
        snapshot
    }
}

/// Registry record for an entity: ownership and visibility metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRegistryEntry {
    pub entity_id: String,

    #[serde(default)]
    pub device_id: Option<String>,

    #[serde(default)]
    pub area_id: Option<String>,

    /// Free-form labels attached by the user (e.g. "problem").
    #[serde(default)]
    pub labels: Vec<String>,

    /// Hidden entities can be dropped from display via a feature flag.
    #[serde(default)]
    pub hidden: bool,
}

impl EntityRegistryEntry {
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            device_id: None,
            area_id: None,
            labels: Vec::new(),
            hidden: false,
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Registry record for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRegistryEntry {
    pub device_id: String,

    #[serde(default)]
    pub area_id: Option<String>,

    #[serde(default)]
    pub labels: Vec<String>,
}

impl DeviceRegistryEntry {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            area_id: None,
            labels: Vec::new(),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Registry record for a physical area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRegistryEntry {
    pub area_id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    /// Optional background picture for the area.
    #[serde(default)]
    pub picture: Option<String>,

    /// Canonical default sensor per device class, keyed by device class
    /// (the host's `<device_class>_entity_id` convention). When a class
    /// has a default, only that sensor is eligible for auto-aggregation.
    #[serde(default)]
    pub sensor_defaults: HashMap<String, String>,
}

impl AreaRegistryEntry {
    pub fn new(area_id: impl Into<String>) -> Self {
        Self {
            area_id: area_id.into(),
            name: None,
            icon: None,
            picture: None,
            sensor_defaults: HashMap::new(),
        }
    }

    /// The designated default sensor id for a device class, if the area
    /// registers one.
    pub fn default_sensor(&self, device_class: &str) -> Option<&str> {
        self.sensor_defaults.get(device_class).map(String::as_str)
    }
}

/// Host-maintained entity→device→area ownership maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registries {
    entities: HashMap<String, EntityRegistryEntry>,
    devices: HashMap<String, DeviceRegistryEntry>,
    areas: HashMap<String, AreaRegistryEntry>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entry: EntityRegistryEntry) {
        self.entities.insert(entry.entity_id.clone(), entry);
    }

    pub fn add_device(&mut self, entry: DeviceRegistryEntry) {
        self.devices.insert(entry.device_id.clone(), entry);
    }

    pub fn add_area(&mut self, entry: AreaRegistryEntry) {
        self.areas.insert(entry.area_id.clone(), entry);
    }

    pub fn entity(&self, entity_id: &str) -> Option<&EntityRegistryEntry> {
        self.entities.get(entity_id)
    }

    pub fn device(&self, device_id: &str) -> Option<&DeviceRegistryEntry> {
        self.devices.get(device_id)
    }

    pub fn area(&self, area_id: &str) -> Option<&AreaRegistryEntry> {
        self.areas.get(area_id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityRegistryEntry> {
        self.entities.values()
    }

    /// The area an entity belongs to, directly or through its device.
    pub fn area_of_entity(&self, entity_id: &str) -> Option<&str> {
        let entry = self.entities.get(entity_id)?;
        if let Some(area) = &entry.area_id {
            return Some(area);
        }
        let device = self.devices.get(entry.device_id.as_deref()?)?;
        device.area_id.as_deref()
    }

    /// Whether the registry marks an entity hidden.
    pub fn is_hidden(&self, entity_id: &str) -> bool {
        self.entities.get(entity_id).is_some_and(|e| e.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_text_state_and_attribute() {
        let state = EntityState::new("sensor.kitchen_temp", "21.5")
            .with_attribute("device_class", "temperature")
            .with_attribute("battery", 87);

        assert_eq!(state.target_text(None), Some("21.5".to_string()));
        assert_eq!(
            state.target_text(Some("device_class")),
            Some("temperature".to_string())
        );
        assert_eq!(state.target_text(Some("battery")), Some("87".to_string()));
        assert_eq!(state.target_text(Some("missing")), None);
    }

    #[test]
    fn test_target_text_skips_containers() {
        let state = EntityState::new("light.kitchen_light", "on")
            .with_attribute("rgb_color", json!([255, 0, 0]))
            .with_attribute("extra", json!({ "nested": true }));

        assert_eq!(state.target_text(Some("rgb_color")), None);
        assert_eq!(state.target_text(Some("extra")), None);
    }

    #[test]
    fn test_placeholder_state() {
        let state = EntityState::placeholder("light.kitchen_light");
        assert_eq!(state.state, "unavailable");
        assert!(state.attributes.is_empty());
        assert_eq!(state.domain(), "light");
    }

    #[test]
    fn test_area_of_entity_prefers_direct_assignment() {
        let mut registries = Registries::new();
        registries.add_device(DeviceRegistryEntry {
            device_id: "dev1".into(),
            area_id: Some("hallway".into()),
            labels: Vec::new(),
        });
        registries.add_entity(EntityRegistryEntry {
            entity_id: "light.lamp".into(),
            device_id: Some("dev1".into()),
            area_id: Some("kitchen".into()),
            labels: Vec::new(),
            hidden: false,
        });

        assert_eq!(registries.area_of_entity("light.lamp"), Some("kitchen"));
    }

    #[test]
    fn test_area_of_entity_falls_back_to_device() {
        let mut registries = Registries::new();
        registries.add_device(DeviceRegistryEntry {
            device_id: "dev1".into(),
            area_id: Some("hallway".into()),
            labels: Vec::new(),
        });
        registries.add_entity(EntityRegistryEntry {
            entity_id: "light.lamp".into(),
            device_id: Some("dev1".into()),
            area_id: None,
            labels: Vec::new(),
            hidden: false,
        });

        assert_eq!(registries.area_of_entity("light.lamp"), Some("hallway"));
        assert_eq!(registries.area_of_entity("light.unknown"), None);
    }

    #[test]
    fn test_default_sensor_lookup() {
        let mut area = AreaRegistryEntry::new("kitchen");
        area.sensor_defaults
            .insert("temperature".into(), "sensor.kitchen_temp".into());

        assert_eq!(area.default_sensor("temperature"), Some("sensor.kitchen_temp"));
        assert_eq!(area.default_sensor("humidity"), None);
    }
}
