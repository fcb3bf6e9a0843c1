//! Keyed object pool
//!
//! Pre-allocates reusable instances per key so that entities spawned and
//! discarded every few frames (enemies, effects, indicators) never hit the
//! allocator on the hot path:
//! - Inactive instances are recycled in FIFO order
//! - An exhausted key grows by exactly one instance on demand
//! - Every instance ever created is tracked for bulk reclaim

mod object_pool;

pub use object_pool::{Factory, ObjectPool, PoolEntry, PoolError, PoolHandle, PoolKey, Poolable};
