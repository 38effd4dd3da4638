pub mod config;
pub mod engine;
pub mod ha;
pub mod host;

pub use config::EntityConfig;
pub use config::EntityRef;
pub use config::Feature;
pub use config::RoomConfig;
pub use engine::derive_view_model;
pub use engine::match_badge;
pub use engine::match_color;
pub use engine::classify;
pub use engine::ChangedFragments;
pub use engine::EntityInformation;
pub use engine::RoomViewGate;
pub use engine::ViewModel;
pub use ha::EntityState;
pub use ha::Registries;
pub use ha::Snapshot;
pub use host::HostError;
pub use host::HostServices;
