//! User-authored styling rules.
//!
//! A rule list is ordered, and order is the contract: the first rule whose
//! condition holds wins, regardless of how "specific" a later rule looks.
//! State rules and threshold rules are distinct variants with their own
//! operator enums; a rule targets the entity's bare state unless it names
//! an attribute.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::Display;

/// Comparison operator for state rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StateOp {
    #[default]
    Eq,
    Ne,
}

impl From<&str> for StateOp {
    fn from(s: &str) -> Self {
        match s {
            "ne" => Self::Ne,
            // Unrecognized operators fall back to the documented default.
            _ => Self::Eq,
        }
    }
}

impl<'de> Deserialize<'de> for StateOp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Comparison operator for threshold rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThresholdOp {
    Gt,
    #[default]
    Gte,
    Lt,
    Lte,
    Eq,
}

impl From<&str> for ThresholdOp {
    fn from(s: &str) -> Self {
        match s {
            "gt" => Self::Gt,
            "lt" => Self::Lt,
            "lte" => Self::Lte,
            "eq" => Self::Eq,
            _ => Self::Gte,
        }
    }
}

impl<'de> Deserialize<'de> for ThresholdOp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Styling payload a matching rule supplies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RulePayload {
    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub icon_color: Option<String>,

    /// Free-form style overrides, passed through to the rendering layer.
    #[serde(default)]
    pub styles: Map<String, Value>,
}

/// Exact (or negated) string match on the state or a named attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRule {
    /// Attribute to compare instead of the bare state.
    #[serde(default)]
    pub attribute: Option<String>,

    /// Expected value, compared case-sensitively.
    #[serde(alias = "value")]
    pub state: String,

    #[serde(default)]
    pub op: StateOp,

    #[serde(flatten)]
    pub payload: RulePayload,
}

impl StateRule {
    pub fn new(state: impl Into<String>, op: StateOp) -> Self {
        Self {
            attribute: None,
            state: state.into(),
            op,
            payload: RulePayload::default(),
        }
    }
}

/// Numeric comparison on the state or a named attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    #[serde(default)]
    pub attribute: Option<String>,

    pub threshold: f64,

    #[serde(default)]
    pub op: ThresholdOp,

    #[serde(flatten)]
    pub payload: RulePayload,
}

impl ThresholdRule {
    pub fn new(threshold: f64, op: ThresholdOp) -> Self {
        Self {
            attribute: None,
            threshold,
            op,
            payload: RulePayload::default(),
        }
    }
}

/// How a badge overlay is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BadgeMode {
    /// Delegate badge rendering to the host entirely.
    #[default]
    Homeassistant,
    /// Render only when one of the badge rules matches.
    IfMatch,
    /// Always render; fall back to the entity's own icon on no match.
    ShowAlways,
}

impl From<&str> for BadgeMode {
    fn from(s: &str) -> Self {
        match s {
            "if_match" => Self::IfMatch,
            "show_always" => Self::ShowAlways,
            _ => Self::Homeassistant,
        }
    }
}

impl<'de> Deserialize<'de> for BadgeMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Badge overlay configuration: a state-rule list plus a display mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BadgeConfig {
    #[serde(default)]
    pub rules: Vec<StateRule>,

    #[serde(default)]
    pub mode: BadgeMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_operators_fall_back_to_defaults() {
        assert_eq!(StateOp::from("regex"), StateOp::Eq);
        assert_eq!(ThresholdOp::from("approximately"), ThresholdOp::Gte);
        assert_eq!(BadgeMode::from("sometimes"), BadgeMode::Homeassistant);
    }

    #[test]
    fn test_state_rule_from_json() {
        let rule: StateRule = serde_json::from_value(serde_json::json!({
            "state": "heat",
            "op": "ne",
            "icon": "mdi:fire",
            "icon_color": "red",
        }))
        .unwrap();

        assert_eq!(rule.state, "heat");
        assert_eq!(rule.op, StateOp::Ne);
        assert_eq!(rule.payload.icon.as_deref(), Some("mdi:fire"));
        assert_eq!(rule.payload.icon_color.as_deref(), Some("red"));
        assert!(rule.attribute.is_none());
    }

    #[test]
    fn test_threshold_rule_defaults_operator() {
        let rule: ThresholdRule = serde_json::from_value(serde_json::json!({
            "threshold": 50,
            "icon_color": "orange",
        }))
        .unwrap();

        assert_eq!(rule.op, ThresholdOp::Gte);
        assert_eq!(rule.threshold, 50.0);
    }

    #[test]
    fn test_bad_operator_string_degrades_not_fails() {
        let rule: ThresholdRule = serde_json::from_value(serde_json::json!({
            "threshold": 10,
            "op": "gibberish",
        }))
        .unwrap();

        assert_eq!(rule.op, ThresholdOp::Gte);
    }

    #[test]
    fn test_operator_display() {
        insta::assert_snapshot!(ThresholdOp::Gte.to_string(), @"gte");
        insta::assert_snapshot!(StateOp::Ne.to_string(), @"ne");
        insta::assert_snapshot!(BadgeMode::ShowAlways.to_string(), @"show_always");
    }
}
