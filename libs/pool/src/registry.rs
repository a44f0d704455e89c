//! Pool Registry
//!
//! Concurrent map of every initialized pool keyed by [`PoolId`], plus a
//! mint index for discovery. Each pool sits behind its own mutex so
//! operations on different pools never contend.

use crate::error::PoolError;
use crate::state::{PoolInfo, PoolState};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dex_types::{Address, MintPair, PoolId};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Shared reference to one pool
#[derive(Debug, Clone)]
pub struct PoolHandle {
    id: PoolId,
    state: Arc<Mutex<PoolState>>,
}

impl PoolHandle {
    fn new(state: PoolState) -> Self {
        Self {
            id: state.id(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Run one mutation against the pool
    ///
    /// `op` works on a private copy while the pool lock is held; the copy
    /// replaces the live state only if `op` returns `Ok`. Operations on the
    /// same pool are therefore serialized and never observed half-applied.
    pub fn transact<T, F>(&self, op: F) -> Result<T, PoolError>
    where
        F: FnOnce(&mut PoolState) -> Result<T, PoolError>,
    {
        let mut guard = self.state.lock();
        let mut draft = *guard;
        let out = op(&mut draft)?;
        *guard = draft;
        Ok(out)
    }

    /// Consistent snapshot of the pool
    pub fn snapshot(&self) -> PoolState {
        *self.state.lock()
    }

    pub fn info(&self) -> PoolInfo {
        self.state.lock().info()
    }
}

#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: DashMap<PoolId, PoolHandle>,
    /// mint -> pools holding it
    mint_index: DashMap<Address, Vec<PoolId>>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created pool; fails if its id is already taken
    pub fn register(&self, state: PoolState) -> Result<PoolHandle, PoolError> {
        let pair = state.pair();
        let handle = match self.pools.entry(state.id()) {
            Entry::Occupied(_) => {
                return Err(PoolError::DuplicatePool {
                    pool_id: state.id(),
                    pair,
                })
            }
            Entry::Vacant(slot) => slot.insert(PoolHandle::new(state)).clone(),
        };

        for mint in [pair.mint0(), pair.mint1()] {
            self.mint_index.entry(mint).or_default().push(handle.id());
        }

        info!(
            "Registered pool {} for {} ({} pools total)",
            handle.id().short(),
            pair,
            self.pools.len()
        );
        Ok(handle)
    }

    pub fn get(&self, pool_id: &PoolId) -> Option<PoolHandle> {
        self.pools.get(pool_id).map(|entry| entry.clone())
    }

    /// Lookup by mints in either order
    pub fn get_by_pair(&self, mint_a: Address, mint_b: Address) -> Option<PoolHandle> {
        let pair = MintPair::new(mint_a, mint_b).ok()?;
        self.get(&PoolId::for_pair(&pair))
    }

    pub fn contains(&self, pool_id: &PoolId) -> bool {
        self.pools.contains_key(pool_id)
    }

    /// Pools holding `mint` on either side, in id order
    pub fn pools_for_mint(&self, mint: &Address) -> Vec<PoolId> {
        let mut ids = self
            .mint_index
            .get(mint)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Snapshot of every pool, in id order
    pub fn list(&self) -> Vec<PoolInfo> {
        // collect handles first so no map shard is held while taking pool locks
        let handles: Vec<PoolHandle> = self.pools.iter().map(|entry| entry.value().clone()).collect();
        let mut infos: Vec<PoolInfo> = handles.iter().map(PoolHandle::info).collect();
        infos.sort_by_key(|info| info.pool_id);
        infos
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
