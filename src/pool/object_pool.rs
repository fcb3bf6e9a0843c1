//! Pool containers, handles and the pool itself

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Anything usable as a pool key.
///
/// The game uses a closed enum, but string tags work just as well.
pub trait PoolKey: Copy + Eq + Hash + fmt::Debug {}

impl<T: Copy + Eq + Hash + fmt::Debug> PoolKey for T {}

/// An object the pool can toggle and place
pub trait Poolable {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    /// Apply spawn placement (world position, rotation in radians)
    fn place(&mut self, position: Vec2, rotation: f32);
}

/// Creates a fresh instance for a key
pub type Factory<T> = Box<dyn FnMut() -> T>;

/// One entry of the startup registration list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolEntry<K> {
    pub key: K,
    pub initial_count: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError<K: fmt::Debug> {
    #[error("pool with key {0:?} doesn't exist")]
    UnknownKey(K),
    #[error("pool with key {0:?} is already registered")]
    AlreadyRegistered(K),
    #[error("handle belongs to pool {found:?}, not {expected:?}")]
    KeyMismatch { expected: K, found: K },
    #[error("stale or out-of-range handle {index} for pool {key:?}")]
    InvalidHandle { key: K, index: u32 },
}

/// Reference to a pooled instance.
///
/// The pool owns the instance; callers go through [`ObjectPool::get`] and
/// [`ObjectPool::get_mut`]. A handle is only good for one acquire: once the
/// instance is handed out again, older handles to it are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle<K> {
    key: K,
    index: u32,
    /// Registration the handle was issued under (detects use after teardown)
    registration: u32,
    /// Acquire count of the slot when the handle was issued
    generation: u32,
}

impl<K: PoolKey> PoolHandle<K> {
    pub fn key(&self) -> K {
        self.key
    }

    /// Position of the instance in its key's creation order
    pub fn index(&self) -> u32 {
        self.index
    }
}

struct PoolContainer<T> {
    factory: Factory<T>,
    /// Indices into `all_created`, oldest release first
    inactive: VecDeque<u32>,
    /// Grow-only list of every instance created for this key
    all_created: Vec<T>,
    /// Per-instance acquire counter, parallel to `all_created`
    generations: Vec<u32>,
    registration: u32,
}

impl<T: Poolable> PoolContainer<T> {
    /// Create one instance and track it. Returns its index.
    fn create(&mut self) -> u32 {
        let index = self.all_created.len() as u32;
        self.all_created.push((self.factory)());
        self.generations.push(0);
        index
    }

    /// Hand out slot `index`: bumps its generation and returns the new handle
    fn issue<K: PoolKey>(&mut self, key: K, index: u32) -> PoolHandle<K> {
        let generation = &mut self.generations[index as usize];
        *generation = generation.wrapping_add(1);
        PoolHandle {
            key,
            index,
            registration: self.registration,
            generation: *generation,
        }
    }

    fn handle_for<K: PoolKey>(&self, key: K, index: u32) -> PoolHandle<K> {
        PoolHandle {
            key,
            index,
            registration: self.registration,
            generation: self.generations[index as usize],
        }
    }

    fn check<K: PoolKey>(&self, handle: PoolHandle<K>) -> Result<usize, PoolError<K>> {
        let index = handle.index as usize;
        let current = self.generations.get(index).copied();
        if handle.registration != self.registration || current != Some(handle.generation) {
            return Err(PoolError::InvalidHandle {
                key: handle.key,
                index: handle.index,
            });
        }
        Ok(index)
    }

    fn slot<K: PoolKey>(&self, handle: PoolHandle<K>) -> Result<&T, PoolError<K>> {
        let index = self.check(handle)?;
        Ok(&self.all_created[index])
    }

    fn slot_mut<K: PoolKey>(&mut self, handle: PoolHandle<K>) -> Result<&mut T, PoolError<K>> {
        let index = self.check(handle)?;
        Ok(&mut self.all_created[index])
    }

    fn active_count(&self) -> usize {
        self.all_created.iter().filter(|o| o.is_active()).count()
    }
}

/// Per-key pool of reusable instances
pub struct ObjectPool<K: PoolKey, T: Poolable + 'static> {
    containers: HashMap<K, PoolContainer<T>>,
    /// Registration order, for deterministic bulk operations
    order: Vec<K>,
    next_registration: u32,
}

impl<K: PoolKey, T: Poolable + 'static> Default for ObjectPool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PoolKey, T: Poolable + 'static> ObjectPool<K, T> {
    pub fn new() -> Self {
        Self {
            containers: HashMap::new(),
            order: Vec::new(),
            next_registration: 0,
        }
    }

    /// Register `key`, pre-creating `initial_count` inactive instances.
    ///
    /// Must happen before any acquire/release for that key.
    pub fn register<F>(&mut self, key: K, factory: F, initial_count: usize) -> Result<(), PoolError<K>>
    where
        F: FnMut() -> T + 'static,
    {
        if self.containers.contains_key(&key) {
            log::error!("Pool with key {key:?} is already registered");
            return Err(PoolError::AlreadyRegistered(key));
        }

        let mut container = PoolContainer {
            factory: Box::new(factory),
            inactive: VecDeque::with_capacity(initial_count),
            all_created: Vec::with_capacity(initial_count),
            generations: Vec::with_capacity(initial_count),
            registration: self.next_registration,
        };
        self.next_registration = self.next_registration.wrapping_add(1);

        for _ in 0..initial_count {
            let index = container.create();
            container.all_created[index as usize].set_active(false);
            container.inactive.push_back(index);
        }

        log::debug!("Registered pool {key:?} with {initial_count} instances");
        self.containers.insert(key, container);
        self.order.push(key);
        Ok(())
    }

    /// Register an ordered list of entries, resolving each key's factory
    pub fn register_all<F>(&mut self, entries: &[PoolEntry<K>], mut factory_for: F) -> Result<(), PoolError<K>>
    where
        F: FnMut(K) -> Factory<T>,
    {
        for entry in entries {
            self.register(entry.key, factory_for(entry.key), entry.initial_count)?;
        }
        Ok(())
    }

    /// Take the oldest inactive instance for `key`, growing the pool if none is left
    pub fn acquire(&mut self, key: K, position: Vec2, rotation: f32) -> Result<PoolHandle<K>, PoolError<K>> {
        let Some(container) = self.containers.get_mut(&key) else {
            log::warn!("Pool with key {key:?} doesn't exist");
            return Err(PoolError::UnknownKey(key));
        };

        let index = match container.inactive.pop_front() {
            Some(index) => index,
            None => {
                log::warn!(
                    "Pool with key {key:?} is empty, expanding to {}",
                    container.all_created.len() + 1
                );
                container.create()
            }
        };

        let instance = &mut container.all_created[index as usize];
        instance.set_active(true);
        instance.place(position, rotation);

        Ok(container.issue(key, index))
    }

    /// Return an instance to its pool, checking it against an expected key
    pub fn release_keyed(&mut self, key: K, handle: PoolHandle<K>) -> Result<(), PoolError<K>> {
        if handle.key != key {
            log::error!("Tried to return a {:?} instance to pool {key:?}", handle.key);
            return Err(PoolError::KeyMismatch {
                expected: key,
                found: handle.key,
            });
        }
        self.release(handle)
    }

    /// Mark an instance inactive and queue it last for reuse.
    ///
    /// If its key is no longer registered the instance is already gone and
    /// the handle is discarded.
    pub fn release(&mut self, handle: PoolHandle<K>) -> Result<(), PoolError<K>> {
        let key = handle.key;
        let Some(container) = self.containers.get_mut(&key) else {
            log::warn!("Pool with key {key:?} doesn't exist, discarding instance {}", handle.index);
            return Err(PoolError::UnknownKey(key));
        };

        let instance = container.slot_mut(handle).inspect_err(|err| log::warn!("{err}"))?;
        if !instance.is_active() {
            log::warn!("Instance {} of pool {key:?} is already inactive", handle.index);
            return Ok(());
        }

        instance.set_active(false);
        container.inactive.push_back(handle.index);
        Ok(())
    }

    /// Release every active instance of every key. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for key in &self.order {
            let Some(container) = self.containers.get_mut(key) else {
                continue;
            };
            for (index, instance) in container.all_created.iter_mut().enumerate() {
                if instance.is_active() {
                    instance.set_active(false);
                    container.inactive.push_back(index as u32);
                    released += 1;
                }
            }
        }
        if released > 0 {
            log::debug!("Returned {released} instances to their pools");
        }
        released
    }

    pub fn get(&self, handle: PoolHandle<K>) -> Option<&T> {
        self.containers.get(&handle.key)?.slot(handle).ok()
    }

    pub fn get_mut(&mut self, handle: PoolHandle<K>) -> Option<&mut T> {
        self.containers.get_mut(&handle.key)?.slot_mut(handle).ok()
    }

    pub fn is_registered(&self, key: K) -> bool {
        self.containers.contains_key(&key)
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> &[K] {
        &self.order
    }

    /// Number of instances ever created for `key` (initial count plus growth)
    pub fn total_created(&self, key: K) -> usize {
        self.containers.get(&key).map_or(0, |c| c.all_created.len())
    }

    pub fn inactive_count(&self, key: K) -> usize {
        self.containers.get(&key).map_or(0, |c| c.inactive.len())
    }

    pub fn active_count(&self, key: K) -> usize {
        self.containers.get(&key).map_or(0, |c| c.active_count())
    }

    /// Handles of the active instances of `key`, in creation order
    pub fn active_handles(&self, key: K) -> Vec<PoolHandle<K>> {
        let Some(container) = self.containers.get(&key) else {
            return Vec::new();
        };
        container
            .all_created
            .iter()
            .enumerate()
            .filter(|(_, instance)| instance.is_active())
            .map(|(index, _)| container.handle_for(key, index as u32))
            .collect()
    }

    /// Tear down one key's pool, dropping all of its instances
    pub fn unregister(&mut self, key: K) -> bool {
        let removed = self.containers.remove(&key).is_some();
        if removed {
            self.order.retain(|k| *k != key);
            log::debug!("Unregistered pool {key:?}");
        }
        removed
    }

    /// Tear down every pool
    pub fn clear(&mut self) {
        self.containers.clear();
        self.order.clear();
    }
}

impl<K: PoolKey, T: Poolable + 'static> fmt::Debug for ObjectPool<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in &self.order {
            map.entry(key, &(self.inactive_count(*key), self.total_created(*key)));
        }
        map.finish()
    }
}
