// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory cache of Spotify access grants, keyed on client id.

use crate::models::AccessGrant;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Margin before grant expiration when we stop reusing it (1 minute).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Cached access token with expiry information.
#[derive(Clone)]
pub struct CachedGrant {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedGrant {
    /// Build a cache entry from a fresh grant. Grants without a lifetime,
    /// or with one too large to represent, are not cacheable.
    pub fn from_grant(grant: &AccessGrant, issued_at: DateTime<Utc>) -> Option<Self> {
        let lifetime = grant.expires_in.filter(|secs| *secs > 0)?;
        let expires_at = issued_at.checked_add_signed(Duration::try_seconds(lifetime)?)?;
        Some(Self {
            access_token: grant.access_token.clone(),
            expires_at,
        })
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Shared grant cache plus per-key refresh locks.
///
/// Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct AccessGrantCache {
    grants: Arc<DashMap<String, CachedGrant>>,
    refresh_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl AccessGrantCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a cached token for `key` if it is not about to expire.
    pub fn fresh_token(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        self.grants
            .get(key)
            .filter(|cached| cached.is_fresh(now))
            .map(|cached| cached.access_token.clone())
    }

    pub fn insert(&self, key: &str, grant: CachedGrant) {
        self.grants.insert(key.to_string(), grant);
    }

    /// Drop the cached grant for `key`, but only if it is still the one
    /// holding `access_token`. A grant refreshed in the meantime survives.
    pub fn invalidate_token(&self, key: &str, access_token: &str) {
        self.grants
            .remove_if(key, |_, cached| cached.access_token == access_token);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.grants.contains_key(key)
    }

    /// Lock serializing refreshes for one key.
    pub fn refresh_lock(&self, key: &str) -> Arc<Mutex<()>> {
        self.refresh_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(expires_in: Option<i64>) -> AccessGrant {
        AccessGrant {
            access_token: "token".to_string(),
            token_type: Some("Bearer".to_string()),
            expires_in,
            scope: None,
        }
    }

    #[test]
    fn test_fresh_until_margin() {
        let issued = Utc::now();
        let cached = CachedGrant::from_grant(&grant(Some(3600)), issued).unwrap();

        assert!(cached.is_fresh(issued));
        assert!(cached.is_fresh(issued + Duration::seconds(3600 - 61)));
        assert!(!cached.is_fresh(issued + Duration::seconds(3600 - 60)));
        assert!(!cached.is_fresh(issued + Duration::seconds(7200)));
    }

    #[test]
    fn test_grant_without_lifetime_not_cached() {
        assert!(CachedGrant::from_grant(&grant(None), Utc::now()).is_none());
        assert!(CachedGrant::from_grant(&grant(Some(0)), Utc::now()).is_none());
    }

    #[test]
    fn test_unrepresentable_lifetime_not_cached() {
        let now = Utc::now();
        assert!(CachedGrant::from_grant(&grant(Some(i64::MAX)), now).is_none());
        assert!(CachedGrant::from_grant(&grant(Some(10_000_000_000_000_000)), now).is_none());
        // Representable as a delta, but past the end of the calendar
        assert!(CachedGrant::from_grant(&grant(Some(i64::MAX / 1000)), now).is_none());
    }

    #[test]
    fn test_cache_lookup_and_invalidate() {
        let cache = AccessGrantCache::new();
        let now = Utc::now();
        cache.insert(
            "client",
            CachedGrant::from_grant(&grant(Some(3600)), now).unwrap(),
        );

        assert_eq!(cache.fresh_token("client", now).as_deref(), Some("token"));
        assert_eq!(cache.fresh_token("other", now), None);
        assert_eq!(
            cache.fresh_token("client", now + Duration::seconds(3590)),
            None
        );

        // A different (stale) token does not evict the current grant
        cache.invalidate_token("client", "stale");
        assert!(cache.contains("client"));

        cache.invalidate_token("client", "token");
        assert!(!cache.contains("client"));
    }

    #[test]
    fn test_refresh_lock_shared_per_key() {
        let cache = AccessGrantCache::new();
        let a = cache.refresh_lock("client");
        let b = cache.clone().refresh_lock("client");
        let c = cache.refresh_lock("other");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
