//! End-to-end derivation scenarios over in-memory snapshot and
//! registries.

use roomcard::config::ActionConfig;
use roomcard::config::OccupancyConfig;
use roomcard::config::StateOp;
use roomcard::config::StateRule;
use roomcard::config::ThresholdOp;
use roomcard::config::ThresholdRule;
use roomcard::derive_view_model;
use roomcard::engine::match_color;
use roomcard::EntityConfig;
use roomcard::EntityInformation;
use roomcard::EntityRef;
use roomcard::EntityState;
use roomcard::Registries;
use roomcard::RoomConfig;
use roomcard::RoomViewGate;
use roomcard::Snapshot;

fn kitchen_snapshot() -> Snapshot {
    let mut snapshot = Snapshot::new();
    snapshot.insert(EntityState::new("light.kitchen_light", "on"));
    snapshot.insert(EntityState::new("switch.kitchen_fan", "off"));
    snapshot
}

#[test]
fn kitchen_defaults_resolve_to_base_entities() {
    // Area "kitchen", no explicit entities, exclude_default_entities
    // unset: exactly the two conventional base entities, in that order.
    let config = RoomConfig::new("kitchen");
    let view = derive_view_model(&config, &kitchen_snapshot(), &Registries::new(), &[]);

    let ids: Vec<_> = view
        .entities
        .iter()
        .map(|e| e.config.entity_id.as_str())
        .collect();
    assert_eq!(ids, vec!["light.kitchen_light", "switch.kitchen_fan"]);

    assert_eq!(view.main.config.entity_id, "light.kitchen_light");
    assert_eq!(
        view.main.config.tap_action,
        Some(ActionConfig::navigate("/kitchen"))
    );
    assert_eq!(view.room.name, "Kitchen");
    assert!(!view.occupancy);
    assert!(!view.mold_visible);
    assert!(view.problems.entity_ids.is_empty());
}

#[test]
fn threshold_fallthrough_resolves_second_rule() {
    // [{80, green, gte}, {50, orange}] against state "75": the 80 rule
    // fails first, evaluation falls to the 50 rule.
    let mut green = ThresholdRule::new(80.0, ThresholdOp::Gte);
    green.payload.icon_color = Some("green".to_string());
    let mut orange = ThresholdRule::new(50.0, ThresholdOp::Gte);
    orange.payload.icon_color = Some("orange".to_string());

    let mut config = EntityConfig::bare("sensor.level");
    config.thresholds = vec![green, orange];

    let entity = EntityInformation {
        config,
        state: Some(EntityState::new("sensor.level", "75")),
    };

    let payload = match_color(&entity).expect("a rule should match");
    assert_eq!(payload.icon_color.as_deref(), Some("orange"));
}

#[test]
fn badge_ordering_scenario() {
    // [{ok, eq}, {ok, ne}] matches rule 0 for "ok" and rule 1 otherwise.
    let mut first = StateRule::new("ok", StateOp::Eq);
    first.payload.icon = Some("mdi:check".to_string());
    let mut second = StateRule::new("ok", StateOp::Ne);
    second.payload.icon = Some("mdi:alert".to_string());

    let mut config = EntityConfig::bare("sensor.status");
    config.states = vec![first, second];

    let mut entity = EntityInformation {
        config,
        state: Some(EntityState::new("sensor.status", "ok")),
    };
    assert_eq!(
        match_color(&entity).unwrap().icon.as_deref(),
        Some("mdi:check")
    );

    entity.state = Some(EntityState::new("sensor.status", "error"));
    assert_eq!(
        match_color(&entity).unwrap().icon.as_deref(),
        Some("mdi:alert")
    );
}

#[test]
fn gating_propagates_only_what_changed() {
    let mut config = RoomConfig::new("kitchen");
    config.occupancy = Some(OccupancyConfig {
        entities: vec!["binary_sensor.kitchen_motion".to_string()],
        disabled_styles: Vec::new(),
    });

    let registries = Registries::new();
    let mut snapshot = kitchen_snapshot();
    snapshot.insert(EntityState::new("binary_sensor.kitchen_motion", "off"));

    let mut gate = RoomViewGate::new();

    // First cycle: everything is new.
    let changed = gate.refresh(derive_view_model(&config, &snapshot, &registries, &[]));
    assert!(changed.any());

    // Same snapshot again: recomputation happens, nothing propagates.
    let changed = gate.refresh(derive_view_model(&config, &snapshot, &registries, &[]));
    assert!(!changed.any());

    // Motion starts: only the occupancy fragment moves.
    snapshot.insert(EntityState::new("binary_sensor.kitchen_motion", "on"));
    let changed = gate.refresh(derive_view_model(&config, &snapshot, &registries, &[]));
    assert!(changed.occupancy);
    assert!(!changed.room && !changed.main && !changed.entities);
    assert!(!changed.problems && !changed.sensors && !changed.mold);

    // The main light turns off: only the entity fragments move.
    snapshot.insert(EntityState::new("light.kitchen_light", "off"));
    let changed = gate.refresh(derive_view_model(&config, &snapshot, &registries, &[]));
    assert!(changed.main && changed.entities);
    assert!(!changed.occupancy && !changed.sensors);
}

#[test]
fn configured_entity_with_rules_flows_through_pipeline() {
    let mut snapshot = kitchen_snapshot();
    snapshot.insert(
        EntityState::new("sensor.kitchen_co2", "900")
            .with_attribute("device_class", "carbon_dioxide"),
    );

    let mut warn_rule = ThresholdRule::new(800.0, ThresholdOp::Gte);
    warn_rule.payload.icon_color = Some("red".to_string());
    let mut inline = EntityConfig::bare("sensor.kitchen_co2");
    inline.thresholds = vec![warn_rule];

    let mut config = RoomConfig::new("kitchen");
    config.entities = vec![EntityRef::Config(inline)];

    let view = derive_view_model(&config, &snapshot, &Registries::new(), &[]);
    let co2 = view
        .entities
        .iter()
        .find(|e| e.config.entity_id == "sensor.kitchen_co2")
        .expect("configured entity should resolve");

    let payload = match_color(co2).expect("threshold rule should match");
    assert_eq!(payload.icon_color.as_deref(), Some("red"));
}
