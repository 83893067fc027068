//! Concurrent job scheduling for world generation and meshing (§4.4):
//! distance-ordered priority queues feeding a pair of rayon worker pools.

pub mod queue;
pub mod workers;

pub use queue::JobQueue;
pub use workers::{JobSystem, PoolCategory};
