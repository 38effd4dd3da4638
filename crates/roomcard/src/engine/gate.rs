//! Update gating: deep-equality-gated propagation of view-model
//! fragments.
//!
//! The host delivers full snapshots at arbitrary frequency (any entity
//! change anywhere in the home can trigger one), so the pipeline
//! recomputes on every call. What is gated is propagation: a fragment is
//! reported as changed only when it structurally differs from the
//! previous cycle's value, so downstream redraw stays minimal. The
//! previous cycle's fragments are the only state carried across cycles,
//! and they are read-only once stored.

use super::EntityInformation;
use super::ProblemFragment;
use super::RoomFragment;
use super::SensorFragment;
use super::ViewModel;

/// Memo cell over one derived value.
///
/// `accept` stores the incoming value and reports whether it differed
/// from the retained one. The very first value is always a change.
#[derive(Debug, Clone)]
pub struct Gate<T: PartialEq> {
    previous: Option<T>,
}

impl<T: PartialEq> Default for Gate<T> {
    fn default() -> Self {
        Self { previous: None }
    }
}

impl<T: PartialEq> Gate<T> {
    pub fn new() -> Self {
        Self { previous: None }
    }

    pub fn accept(&mut self, next: T) -> bool {
        if self.previous.as_ref() == Some(&next) {
            return false;
        }
        self.previous = Some(next);
        true
    }

    /// The last accepted value.
    pub fn current(&self) -> Option<&T> {
        self.previous.as_ref()
    }
}

/// Which fragments of the view model changed this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangedFragments {
    pub room: bool,
    pub main: bool,
    pub entities: bool,
    pub problems: bool,
    pub sensors: bool,
    pub occupancy: bool,
    pub mold: bool,
}

impl ChangedFragments {
    pub fn any(&self) -> bool {
        self.room
            || self.main
            || self.entities
            || self.problems
            || self.sensors
            || self.occupancy
            || self.mold
    }
}

/// One gate per view-model fragment.
#[derive(Debug, Default)]
pub struct RoomViewGate {
    room: Gate<RoomFragment>,
    main: Gate<EntityInformation>,
    entities: Gate<Vec<EntityInformation>>,
    problems: Gate<ProblemFragment>,
    sensors: Gate<SensorFragment>,
    occupancy: Gate<bool>,
    mold: Gate<bool>,
}

impl RoomViewGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a freshly derived view model, reporting per-fragment
    /// change so callers redraw only what moved.
    pub fn refresh(&mut self, view: ViewModel) -> ChangedFragments {
        let ViewModel {
            room,
            main,
            entities,
            problems,
            sensors,
            occupancy,
            mold_visible,
        } = view;

        ChangedFragments {
            room: self.room.accept(room),
            main: self.main.accept(main),
            entities: self.entities.accept(entities),
            problems: self.problems.accept(problems),
            sensors: self.sensors.accept(sensors),
            occupancy: self.occupancy.accept(occupancy),
            mold: self.mold.accept(mold_visible),
        }
    }
}
