//! Entity-id helpers and the domain active-state heuristic.
//!
//! Entity ids follow Home Assistant's `domain.object_id` convention. The
//! conventional per-area entities (`light.<area>_light`,
//! `switch.<area>_fan`) are synthesized here so the resolver and the
//! tests share one source of truth for the naming scheme.

pub const DOMAIN_LIGHT: &str = "light";
pub const DOMAIN_SWITCH: &str = "switch";
pub const DOMAIN_SENSOR: &str = "sensor";
pub const DOMAIN_CLIMATE: &str = "climate";

/// The domain prefix of an entity id, or the whole id if it has none.
pub fn domain_of(entity_id: &str) -> &str {
    entity_id.split_once('.').map_or(entity_id, |(d, _)| d)
}

/// The object part of an entity id, or the whole id if it has no domain.
pub fn object_id(entity_id: &str) -> &str {
    entity_id.split_once('.').map_or(entity_id, |(_, o)| o)
}

/// Conventional main light id for an area (`light.<area>_light`).
pub fn area_light_id(area_id: &str) -> String {
    format!("{}.{}_light", DOMAIN_LIGHT, area_id)
}

/// Conventional fan id for an area (`switch.<area>_fan`).
pub fn area_fan_id(area_id: &str) -> String {
    format!("{}.{}_fan", DOMAIN_SWITCH, area_id)
}

/// Whether a state string means "this entity is currently doing something".
///
/// The meaning of "active" depends on the domain: a cover is active while
/// open, a lock while unlocked, a person while home. Unknown domains fall
/// back to rejecting the well-known inert states.
pub fn is_active_state(domain: &str, state: &str) -> bool {
    if matches!(state, "unknown" | "unavailable" | "") {
        return false;
    }
    match domain {
        "binary_sensor" | "switch" | "light" | "fan" | "input_boolean" | "siren" | "humidifier" => {
            state == "on"
        }
        "cover" => matches!(state, "open" | "opening"),
        "lock" => state == "unlocked",
        "device_tracker" | "person" => state == "home",
        "vacuum" => matches!(state, "cleaning" | "returning"),
        "media_player" => matches!(state, "playing" | "buffering"),
        "climate" | "water_heater" => state != "off",
        _ => !matches!(state, "off" | "idle" | "standby" | "none"),
    }
}

/// Numeric coercion for state and attribute strings.
///
/// The host's "unknown"/"unavailable" placeholder tokens and anything else
/// that fails to parse resolve to `None`, never to an error.
pub fn coerce_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || matches!(trimmed, "unknown" | "unavailable" | "none") {
        return None;
    }
    trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_split() {
        assert_eq!(domain_of("light.kitchen_light"), "light");
        assert_eq!(object_id("light.kitchen_light"), "kitchen_light");
        assert_eq!(domain_of("no_dot"), "no_dot");
    }

    #[test]
    fn test_conventional_ids() {
        assert_eq!(area_light_id("kitchen"), "light.kitchen_light");
        assert_eq!(area_fan_id("kitchen"), "switch.kitchen_fan");
    }

    #[test]
    fn test_active_state_by_domain() {
        assert!(is_active_state("binary_sensor", "on"));
        assert!(!is_active_state("binary_sensor", "off"));
        assert!(is_active_state("cover", "open"));
        assert!(is_active_state("lock", "unlocked"));
        assert!(!is_active_state("lock", "locked"));
        assert!(is_active_state("person", "home"));
        assert!(!is_active_state("person", "not_home"));
        assert!(is_active_state("climate", "heat"));
        assert!(!is_active_state("climate", "off"));
    }

    #[test]
    fn test_active_state_rejects_placeholder_tokens() {
        assert!(!is_active_state("binary_sensor", "unavailable"));
        assert!(!is_active_state("vacuum", "unknown"));
        assert!(!is_active_state("anything", ""));
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric("21.5"), Some(21.5));
        assert_eq!(coerce_numeric(" 80 "), Some(80.0));
        assert_eq!(coerce_numeric("-3"), Some(-3.0));
        assert_eq!(coerce_numeric("unknown"), None);
        assert_eq!(coerce_numeric("unavailable"), None);
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("not-a-number"), None);
    }
}
