//! Spatial partitioning and broadphase collision pruning
//!
//! The broadphase tracks padded axis-aligned boxes with an incremental
//! sweep-and-prune structure and reports pair start/update/stop transitions
//! each tick. It knows nothing about shapes or bodies; the simulation layer
//! maps proxies back to bodies when it consumes the events.

pub mod bounds;
pub mod endpoint;
pub mod pair_table;
pub mod sweep_prune;

pub use bounds::AABB;
pub use endpoint::SortableKey;
pub use pair_table::{PairEvent, ProxyPair};
pub use sweep_prune::{BroadphaseError, ProxyId, SweepAndPrune};
