//! User configuration for a room summary panel.
//!
//! The configuration is an in-memory structured object authored through
//! the host's editor; it is immutable for the duration of a render cycle.
//! Persistence and editor validation live outside this crate; anything
//! that deserializes is accepted, and ambiguous shapes (bare entity id
//! vs. inline object) are normalized at the resolver boundary.

pub mod rules;

pub use rules::BadgeConfig;
pub use rules::BadgeMode;
pub use rules::RulePayload;
pub use rules::StateOp;
pub use rules::StateRule;
pub use rules::ThresholdOp;
pub use rules::ThresholdRule;

use serde::Deserialize;
use serde::Serialize;
use strum::Display;

/// Feature flags toggling defaulting and hiding behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    /// Skip the conventional per-area entities and default sensors.
    ExcludeDefaultEntities,
    /// Keep configured entities as placeholders when missing from the
    /// snapshot instead of dropping them.
    StickyEntities,
    /// Disable climate icon inference and the legacy climate thresholds.
    SkipClimateStyles,
    /// Drop entities the registry marks hidden.
    HideHiddenEntities,
}

/// An interaction action bound to tap/hold/double-tap.
///
/// Unknown action strings deserialize to `None` (the documented default
/// for an unrecognized enum value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionConfig {
    Toggle,
    MoreInfo,
    Navigate {
        #[serde(default)]
        navigation_path: Option<String>,
    },
    #[serde(other)]
    None,
}

impl ActionConfig {
    pub fn navigate(path: impl Into<String>) -> Self {
        Self::Navigate {
            navigation_path: Some(path.into()),
        }
    }
}

/// Fully-specifiable display and interaction configuration for one entity.
///
/// Most fields are optional; the resolver fills in defaults (and only
/// attaches default actions when a live state exists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub entity_id: String,

    #[serde(default)]
    pub icon: Option<String>,

    /// Static colors used when no rule matches.
    #[serde(default)]
    pub on_color: Option<String>,

    #[serde(default)]
    pub off_color: Option<String>,

    #[serde(default)]
    pub tap_action: Option<ActionConfig>,

    #[serde(default)]
    pub hold_action: Option<ActionConfig>,

    #[serde(default)]
    pub double_tap_action: Option<ActionConfig>,

    /// Ordered state rules, evaluated before threshold rules.
    #[serde(default)]
    pub states: Vec<StateRule>,

    /// Ordered threshold rules, the fallback list.
    #[serde(default)]
    pub thresholds: Vec<ThresholdRule>,

    #[serde(default)]
    pub badge: Option<BadgeConfig>,
}

impl EntityConfig {
    /// Minimal config for a bare entity-id reference.
    pub fn bare(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            icon: None,
            on_color: None,
            off_color: None,
            tap_action: None,
            hold_action: None,
            double_tap_action: None,
            states: Vec::new(),
            thresholds: Vec::new(),
            badge: None,
        }
    }
}

/// A configured entity: either a bare id or an inline config object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Config(EntityConfig),
}

impl EntityRef {
    /// Normalize to a full config; bare ids become minimal configs.
    pub fn into_config(self) -> EntityConfig {
        match self {
            Self::Id(id) => EntityConfig::bare(id),
            Self::Config(config) => config,
        }
    }

    pub fn entity_id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Config(config) => &config.entity_id,
        }
    }
}

/// Occupancy style parameters a disable flag switches off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OccupancyStyle {
    CardBorder,
    CardAnimation,
    IconColor,
    IconAnimation,
}

/// Presence/motion/occupancy (and smoke detector) configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OccupancyConfig {
    /// Entities whose activity means the room is occupied. Smoke
    /// detectors are listed here too; an active one counts the same way.
    #[serde(default)]
    pub entities: Vec<String>,

    /// Visual parameter pairs to withhold while occupied.
    #[serde(default)]
    pub disabled_styles: Vec<OccupancyStyle>,
}

/// Mold indicator thresholds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Sensor supplying the mold reading. No entity, no indicator.
    #[serde(default)]
    pub mold_entity: Option<String>,

    /// Visibility threshold for the mold reading; absent means the
    /// indicator shows for any numeric reading.
    #[serde(default)]
    pub mold: Option<f64>,
}

/// Background picture override for the panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackgroundConfig {
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub opacity: Option<f64>,
}

/// Top-level room summary configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Area identifier this panel summarizes.
    pub area: String,

    /// Display-name override for the area.
    #[serde(default)]
    pub area_name: Option<String>,

    /// Explicit main entity; the conventional area light when absent.
    #[serde(default)]
    pub entity: Option<EntityRef>,

    /// Auxiliary entities, in declaration order.
    #[serde(default)]
    pub entities: Vec<EntityRef>,

    /// Individually displayed sensors, never averaged.
    #[serde(default)]
    pub sensors: Vec<String>,

    /// Device classes to auto-aggregate; empty means every numeric class
    /// the host knows.
    #[serde(default)]
    pub sensor_classes: Vec<String>,

    #[serde(default)]
    pub features: Vec<Feature>,

    #[serde(default)]
    pub occupancy: Option<OccupancyConfig>,

    #[serde(default)]
    pub thresholds: Option<ThresholdsConfig>,

    #[serde(default)]
    pub background: Option<BackgroundConfig>,

    /// Navigation target override for the main entity's default tap.
    #[serde(default)]
    pub navigate: Option<String>,
}

impl RoomConfig {
    pub fn new(area: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            area_name: None,
            entity: None,
            entities: Vec::new(),
            sensors: Vec::new(),
            sensor_classes: Vec::new(),
            features: Vec::new(),
            occupancy: None,
            thresholds: None,
            background: None,
            navigate: None,
        }
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_ref_bare_string_normalizes() {
        let entity_ref: EntityRef = serde_json::from_value(json!("light.desk_lamp")).unwrap();
        let config = entity_ref.into_config();
        assert_eq!(config.entity_id, "light.desk_lamp");
        assert!(config.tap_action.is_none());
        assert!(config.states.is_empty());
    }

    #[test]
    fn test_entity_ref_inline_object() {
        let entity_ref: EntityRef = serde_json::from_value(json!({
            "entity_id": "fan.ceiling",
            "icon": "mdi:fan",
            "tap_action": { "action": "more_info" },
        }))
        .unwrap();

        let config = entity_ref.into_config();
        assert_eq!(config.entity_id, "fan.ceiling");
        assert_eq!(config.icon.as_deref(), Some("mdi:fan"));
        assert_eq!(config.tap_action, Some(ActionConfig::MoreInfo));
    }

    #[test]
    fn test_unknown_action_degrades_to_none() {
        let action: ActionConfig =
            serde_json::from_value(json!({ "action": "call-service" })).unwrap();
        assert_eq!(action, ActionConfig::None);
    }

    #[test]
    fn test_room_config_from_json() {
        let config: RoomConfig = serde_json::from_value(json!({
            "area": "living_room",
            "entities": ["switch.media", { "entity_id": "fan.ceiling" }],
            "sensor_classes": ["temperature", "humidity"],
            "features": ["sticky_entities", "hide_hidden_entities"],
            "occupancy": {
                "entities": ["binary_sensor.living_room_motion"],
                "disabled_styles": ["card_border"],
            },
        }))
        .unwrap();

        assert_eq!(config.area, "living_room");
        assert_eq!(config.entities.len(), 2);
        assert!(config.has_feature(Feature::StickyEntities));
        assert!(config.has_feature(Feature::HideHiddenEntities));
        assert!(!config.has_feature(Feature::ExcludeDefaultEntities));
        let occupancy = config.occupancy.unwrap();
        assert_eq!(occupancy.disabled_styles, vec![OccupancyStyle::CardBorder]);
    }
}
