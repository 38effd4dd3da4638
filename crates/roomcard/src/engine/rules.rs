//! Ordered rule evaluation for entity styling and badges.
//!
//! Two independent rule lists may be attached to an entity: state rules
//! and threshold rules. State rules are tried first, in declaration
//! order; only if none matches do the threshold rules get a pass, also in
//! declaration order. First match wins in both lists: precedence is
//! controlled purely by list order.

use tracing::trace;

use crate::config::BadgeMode;
use crate::config::RulePayload;
use crate::config::StateOp;
use crate::config::StateRule;
use crate::config::ThresholdOp;
use crate::config::ThresholdRule;
use crate::ha::domains::coerce_numeric;
use crate::ha::EntityState;

use super::EntityInformation;

/// Resolve the styling payload for an entity from its rule lists.
///
/// Returns `None` when no rule matches (including when the entity has no
/// live state); callers then fall back to the entity's static on/off
/// colors.
pub fn match_color(entity: &EntityInformation) -> Option<RulePayload> {
    let state = entity.state.as_ref()?;

    if let Some(payload) = first_state_match(&entity.config.states, state) {
        return Some(payload);
    }
    first_threshold_match(&entity.config.thresholds, state)
}

/// First matching state rule's payload, in declaration order.
pub fn first_state_match(rules: &[StateRule], state: &EntityState) -> Option<RulePayload> {
    for (index, rule) in rules.iter().enumerate() {
        if state_rule_matches(rule, state) {
            trace!(
                entity_id = %state.entity_id,
                index,
                op = %rule.op,
                "state rule matched"
            );
            return Some(rule.payload.clone());
        }
    }
    None
}

/// First matching threshold rule's payload, in declaration order.
pub fn first_threshold_match(rules: &[ThresholdRule], state: &EntityState) -> Option<RulePayload> {
    for (index, rule) in rules.iter().enumerate() {
        if threshold_rule_matches(rule, state) {
            trace!(
                entity_id = %state.entity_id,
                index,
                op = %rule.op,
                threshold = rule.threshold,
                "threshold rule matched"
            );
            return Some(rule.payload.clone());
        }
    }
    None
}

/// Case-sensitive string comparison against the rule's target value.
/// A missing target (absent attribute) never matches, for either operator.
fn state_rule_matches(rule: &StateRule, state: &EntityState) -> bool {
    let Some(value) = state.target_text(rule.attribute.as_deref()) else {
        return false;
    };
    match rule.op {
        StateOp::Eq => value == rule.state,
        StateOp::Ne => value != rule.state,
    }
}

/// Numeric comparison against the rule's target value. A target that
/// fails numeric coercion never matches; evaluation continues with the
/// next rule.
fn threshold_rule_matches(rule: &ThresholdRule, state: &EntityState) -> bool {
    let Some(text) = state.target_text(rule.attribute.as_deref()) else {
        return false;
    };
    let Some(value) = coerce_numeric(&text) else {
        return false;
    };
    match rule.op {
        ThresholdOp::Gt => value > rule.threshold,
        ThresholdOp::Gte => value >= rule.threshold,
        ThresholdOp::Lt => value < rule.threshold,
        ThresholdOp::Lte => value <= rule.threshold,
        ThresholdOp::Eq => value == rule.threshold,
    }
}

/// Resolved badge for an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Badge {
    /// The host renders its own badge for this entity.
    Delegated,
    /// No badge is shown.
    Hidden,
    /// Render a badge with this payload.
    Styled(RulePayload),
}

/// Resolve the badge overlay for an entity from its badge config.
///
/// The same first-match state-rule evaluation as `match_color`,
/// parameterized by the badge's own rule list and display mode.
pub fn match_badge(entity: &EntityInformation) -> Badge {
    let Some(badge) = &entity.config.badge else {
        return Badge::Hidden;
    };

    let matched = entity
        .state
        .as_ref()
        .and_then(|state| first_state_match(&badge.rules, state));

    match badge.mode {
        BadgeMode::Homeassistant => Badge::Delegated,
        BadgeMode::IfMatch => matched.map_or(Badge::Hidden, Badge::Styled),
        BadgeMode::ShowAlways => Badge::Styled(matched.unwrap_or_else(|| RulePayload {
            icon: entity.config.icon.clone(),
            ..RulePayload::default()
        })),
    }
}
