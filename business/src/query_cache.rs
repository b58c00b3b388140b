//! Shared cache for user-identity queries.
//!
//! Flows get and invalidate entries through this state instead of an ambient global.
//! Invalidating keeps the last value around (marked stale) so the page can keep showing it
//! while a refetch is in flight.

use std::any::Any;
use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use log::debug;
use taskflow_states::{State, state_assign_impl};

use crate::api::UserProfile;

/// How long a fetched entry is served without refetching.
pub const STALE_AFTER: Duration = Duration::minutes(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryKey {
    /// Identity used by navigation and the dashboard.
    CurrentUser,
    /// The profile page's copy.
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheEntry {
    value: UserProfile,
    fetched_at: DateTime<Utc>,
    invalidated: bool,
}

/// A cache hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cached<'a> {
    pub value: &'a UserProfile,
    pub fresh: bool,
}

#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: BTreeMap<QueryKey, CacheEntry>,
    invalidations: BTreeMap<QueryKey, u32>,
    clears: u32,
}

impl QueryCache {
    pub fn get(&self, key: QueryKey, now: DateTime<Utc>) -> Option<Cached<'_>> {
        self.entries.get(&key).map(|entry| Cached {
            value: &entry.value,
            fresh: Self::entry_is_fresh(entry, now),
        })
    }

    pub fn store(&mut self, key: QueryKey, value: UserProfile, now: DateTime<Utc>) {
        debug!("QueryCache: storing {key:?}");
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
                invalidated: false,
            },
        );
    }

    /// Mark `key` stale so the next read refetches.
    pub fn invalidate(&mut self, key: QueryKey) {
        debug!("QueryCache: invalidating {key:?}");
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.invalidated = true;
        }
        *self.invalidations.entry(key).or_default() += 1;
    }

    /// Drop every entry, e.g. when the signed-in identity changes.
    pub fn invalidate_all(&mut self) {
        debug!("QueryCache: clearing {} entries", self.entries.len());
        self.entries.clear();
        self.clears += 1;
    }

    pub fn is_fresh(&self, key: QueryKey, now: DateTime<Utc>) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|entry| Self::entry_is_fresh(entry, now))
    }

    fn entry_is_fresh(entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        !entry.invalidated && now - entry.fetched_at < STALE_AFTER
    }

    /// Times `key` was invalidated on its own.
    pub fn invalidation_count(&self, key: QueryKey) -> u32 {
        self.invalidations.get(&key).copied().unwrap_or_default()
    }

    /// Times the whole cache was cleared.
    pub fn clear_count(&self) -> u32 {
        self.clears
    }
}

impl State for QueryCache {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
