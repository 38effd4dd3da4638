//! The state-derivation pipeline.
//!
//! `derive_view_model` is the single synchronous entry point: it takes
//! the current snapshot, the registries and the room configuration and
//! produces a fresh `ViewModel`. Nothing is mutated in place and no
//! hidden state persists across cycles; the only carry-over is the
//! previous cycle's fragments inside `RoomViewGate`, retained solely for
//! equality comparison.

mod gate;
mod indicators;
mod resolve;
mod rules;
mod sensors;

pub use gate::ChangedFragments;
pub use gate::Gate;
pub use gate::RoomViewGate;
pub use indicators::any_problem_active;
pub use indicators::legacy_climate_exceeded;
pub use indicators::mold_indicator;
pub use indicators::mold_visible;
pub use indicators::occupancy_active;
pub use indicators::occupancy_style_params;
pub use indicators::problem_entities;
pub use indicators::problems_visible;
pub use indicators::ClimateKind;
pub use indicators::ProblemDisplayPolicy;
pub use indicators::PROBLEM_LABEL;
pub use resolve::resolve_entities;
pub use resolve::resolve_main_entity;
pub use rules::match_badge;
pub use rules::match_color;
pub use rules::Badge;
pub use sensors::allowed_sensor_classes;
pub use sensors::classify;
pub use sensors::group_sensors;
pub use sensors::SensorFragment;
pub use sensors::SensorGroup;

use serde::Deserialize;
use serde::Serialize;

use crate::config::EntityConfig;
use crate::config::RoomConfig;
use crate::ha::EntityState;
use crate::ha::Registries;
use crate::ha::Snapshot;

/// A display-ready entity: its fully-defaulted config paired with its
/// live state (or a placeholder / nothing, depending on stickiness).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInformation {
    pub config: EntityConfig,
    pub state: Option<EntityState>,
}

/// Resolved background picture for the panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundDescriptor {
    pub image: Option<String>,
    pub opacity: Option<f64>,
}

/// Room metadata fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomFragment {
    pub name: String,
    pub icon: Option<String>,
    pub background: BackgroundDescriptor,
}

/// Problem-entity fragment: the set plus the "any active" flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemFragment {
    pub entity_ids: Vec<String>,
    pub any_active: bool,
}

impl ProblemFragment {
    pub fn count(&self) -> usize {
        self.entity_ids.len()
    }

    /// Display policy applied to this fragment.
    pub fn visible(&self, policy: ProblemDisplayPolicy) -> bool {
        problems_visible(policy, self.count(), self.any_active)
    }
}

/// The fully-derived, render-ready structure produced once per snapshot
/// cycle. A pure function of (snapshot, registries, config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub room: RoomFragment,
    pub main: EntityInformation,
    pub entities: Vec<EntityInformation>,
    pub problems: ProblemFragment,
    pub sensors: SensorFragment,
    pub occupancy: bool,
    pub mold_visible: bool,
}

/// Derive the view model for one snapshot cycle.
///
/// `numeric_classes` is the host's taxonomy of numeric device classes,
/// fetched once through [`crate::host::HostServices`] by the caller; the
/// derivation itself never awaits.
pub fn derive_view_model(
    config: &RoomConfig,
    snapshot: &Snapshot,
    registries: &Registries,
    numeric_classes: &[String],
) -> ViewModel {
    let allowed = allowed_sensor_classes(config, numeric_classes);
    let problem_ids = problem_entities(registries, &config.area);
    let any_active = any_problem_active(snapshot, &problem_ids);
    let occupancy = occupancy_active(snapshot, config.occupancy.as_ref());

    ViewModel {
        room: room_fragment(config, registries),
        main: resolve_main_entity(config, snapshot),
        entities: resolve_entities(config, snapshot, registries),
        problems: ProblemFragment {
            entity_ids: problem_ids,
            any_active,
        },
        sensors: group_sensors(config, snapshot, registries, &allowed),
        occupancy,
        mold_visible: mold_indicator(snapshot, config),
    }
}

/// Room metadata: configured name override, registry name, or the
/// title-cased area id as a last resort; background from the config
/// image, else the area's registry picture.
fn room_fragment(config: &RoomConfig, registries: &Registries) -> RoomFragment {
    let area = registries.area(&config.area);

    let name = config
        .area_name
        .clone()
        .or_else(|| area.and_then(|a| a.name.clone()))
        .unwrap_or_else(|| title_case(&config.area));

    let configured = config.background.as_ref();
    let background = BackgroundDescriptor {
        image: configured
            .and_then(|b| b.image.clone())
            .or_else(|| area.and_then(|a| a.picture.clone())),
        opacity: configured.and_then(|b| b.opacity),
    };

    RoomFragment {
        name,
        icon: area.and_then(|a| a.icon.clone()),
        background,
    }
}

/// "living_room" → "Living Room".
fn title_case(area_id: &str) -> String {
    area_id
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
