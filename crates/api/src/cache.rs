//! Tag-based in-process cache for campaign list and detail reads.
//!
//! Entries hold stored data (records plus counts or relations), never
//! rendered views: anything that depends on the current date, such as the
//! derived status, is computed by the handler on every read.
//!
//! Every entry carries one or more tags. Mutations invalidate by tag rather
//! than by key: the `campaigns` tag covers every campaign list and
//! `campaign-{id}` covers one campaign's detail. Entries also expire after a
//! fixed TTL, and each cache holds at most `capacity` entries, evicting the
//! least recently used one first.
//!
//! A read that misses takes a [`Stamp`] before querying the database and
//! hands it back on insert. If any of the entry's tags was invalidated in
//! between, the insert is dropped so a slow read cannot put pre-mutation
//! data back after the mutation has invalidated it.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use postforge_core::types::DbId;
use postforge_db::models::campaign::{CampaignAggregate, CampaignSummary};
use tokio::sync::RwLock;

/// Tag attached to every campaign list.
pub const CAMPAIGNS_TAG: &str = "campaigns";

/// Tag for a single campaign's views.
pub fn campaign_tag(id: DbId) -> String {
    format!("campaign-{id}")
}

/// Invalidation epochs remembered per tag before they are collapsed into a
/// single floor.
const MAX_TRACKED_TAGS: usize = 1024;

/// The invalidation epoch observed before a database read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp(u64);

struct Entry<V> {
    value: V,
    tags: Vec<String>,
    stored_at: Instant,
}

struct Inner<V> {
    entries: LruCache<String, Entry<V>>,
    /// Epoch at which each tag was last invalidated.
    invalidated: HashMap<String, u64>,
    /// Bumped by every invalidation.
    epoch: u64,
    /// Stamps older than this are stale for every tag.
    floor: u64,
}

impl<V> Inner<V> {
    fn is_current(&self, stamp: Stamp, tags: &[&str]) -> bool {
        stamp.0 >= self.floor
            && tags
                .iter()
                .all(|t| self.invalidated.get(*t).map_or(true, |&at| at <= stamp.0))
    }
}

/// Tag-invalidated, TTL-bounded LRU cache.
pub struct TagCache<V> {
    ttl: Duration,
    inner: RwLock<Inner<V>>,
}

impl<V: Clone> TagCache<V> {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(Inner {
                entries: LruCache::new(capacity),
                invalidated: HashMap::new(),
                epoch: 0,
                floor: 0,
            }),
        }
    }

    /// Return a fresh entry, if any, and mark it as recently used. An
    /// expired entry is removed on the way out.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.write().await;
        let ttl = self.ttl;
        let fresh = inner
            .entries
            .get(key)
            .map(|e| (e.stored_at.elapsed() < ttl).then(|| e.value.clone()));
        match fresh {
            Some(Some(value)) => Some(value),
            Some(None) => {
                inner.entries.pop(key);
                None
            }
            None => None,
        }
    }

    /// Take a stamp before reading the data that will be inserted.
    pub async fn stamp(&self) -> Stamp {
        Stamp(self.inner.read().await.epoch)
    }

    /// Store `value` under `key` unless one of `tags` was invalidated after
    /// `stamp` was taken. Expired entries are pruned first. Returns whether
    /// the value was stored.
    pub async fn insert(
        &self,
        key: impl Into<String>,
        value: V,
        tags: &[&str],
        stamp: Stamp,
    ) -> bool {
        let key = key.into();
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        if !inner.is_current(stamp, tags) {
            tracing::debug!(key = %key, "Skipping cache insert for invalidated read");
            return false;
        }

        let ttl = self.ttl;
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.stored_at.elapsed() >= ttl)
            .map(|(k, _)| k.clone())
            .collect();
        for k in &expired {
            inner.entries.pop(k);
        }

        inner.entries.put(
            key,
            Entry {
                value,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                stored_at: Instant::now(),
            },
        );
        true
    }

    /// Drop every entry carrying any of `tags` and mark the tags as
    /// invalidated, so reads stamped earlier cannot re-insert. Returns the
    /// number of entries removed.
    pub async fn invalidate_tags(&self, tags: &[&str]) -> usize {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;

        inner.epoch += 1;
        for tag in tags {
            inner.invalidated.insert(tag.to_string(), inner.epoch);
        }
        if inner.invalidated.len() > MAX_TRACKED_TAGS {
            inner.invalidated.clear();
            inner.floor = inner.epoch;
        }

        let doomed: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.tags.iter().any(|t| tags.contains(&t.as_str())))
            .map(|(k, _)| k.clone())
            .collect();
        for k in &doomed {
            inner.entries.pop(k);
        }
        doomed.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

/// Campaign list and detail caches. Wrap in `Arc` and share through
/// `AppState`.
pub struct CampaignCache {
    /// Summaries keyed by the SQL filter that produced them.
    pub lists: TagCache<Arc<Vec<CampaignSummary>>>,
    /// Aggregates keyed by campaign id.
    pub details: TagCache<Arc<CampaignAggregate>>,
}

impl CampaignCache {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            lists: TagCache::new(capacity, ttl),
            details: TagCache::new(capacity, ttl),
        }
    }

    /// Invalidate the shared campaign tag and the campaign's own tag.
    pub async fn invalidate_campaign(&self, id: DbId) {
        let own = campaign_tag(id);
        let tags = [CAMPAIGNS_TAG, own.as_str()];
        let removed =
            self.lists.invalidate_tags(&tags).await + self.details.invalidate_tags(&tags).await;
        tracing::debug!(campaign_id = id, removed, "Campaign views invalidated");
    }
}
