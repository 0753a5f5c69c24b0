//! # Price cache
//!
//! Time-bounded store of provider results keyed by `(scope, address)`.
//! Negative results are cached too, so a provider that keeps failing is
//! asked at most once per TTL window. Expired entries are dropped lazily
//! on the next read.

use crate::address::address_key;
use crate::entity::{PriceQuote, ProviderScope};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Source of "now" for expiry checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to; used for deterministic expiry
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let by = ChronoDuration::from_std(by).unwrap_or(ChronoDuration::zero());
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Result of a cache read
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Fresh quote
    Hit(PriceQuote),
    /// Fresh negative entry: the provider was asked recently and had nothing
    Negative,
    /// No entry, or the entry has expired; the caller must fetch
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    scope: ProviderScope,
    address: String,
}

impl CacheKey {
    fn new(scope: ProviderScope, address: &str) -> Self {
        Self {
            scope,
            address: address_key(address),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    quote: Option<PriceQuote>,
    stored_at: DateTime<Utc>,
}

pub struct PriceCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: ChronoDuration,
    clock: Arc<dyn Clock>,
}

impl PriceCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX),
            clock,
        }
    }

    /// Cache with the wall clock
    pub fn with_ttl(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    pub fn get(&self, scope: ProviderScope, address: &str) -> CacheLookup {
        let key = CacheKey::new(scope, address);
        let now = self.clock.now();
        let mut entries = self.lock();

        let (stored_at, quote) = match entries.get(&key) {
            Some(entry) => (entry.stored_at, entry.quote.clone()),
            None => return CacheLookup::Absent,
        };

        if now - stored_at >= self.ttl {
            debug!("Cache expired for {}:{}", scope, key.address);
            entries.remove(&key);
            return CacheLookup::Absent;
        }

        match quote {
            Some(quote) => CacheLookup::Hit(quote),
            None => CacheLookup::Negative,
        }
    }

    /// Store a quote, or a negative result when `quote` is `None`
    pub fn set(&self, scope: ProviderScope, address: &str, quote: Option<PriceQuote>) {
        let key = CacheKey::new(scope, address);
        let entry = CacheEntry {
            quote,
            stored_at: self.clock.now(),
        };

        self.lock().insert(key, entry);
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // The map stays consistent even if a holder panicked
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);
    const TOKEN: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";

    fn cache_with_clock() -> (PriceCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        (PriceCache::new(TTL, clock.clone()), clock)
    }

    fn quote(price: f64) -> PriceQuote {
        PriceQuote::new(price, Some(price * 1000.0), Utc::now()).unwrap()
    }

    #[test]
    fn test_absent_before_first_set() {
        let (cache, _) = cache_with_clock();
        assert_eq!(cache.get(ProviderScope::CoinGeckoBase, TOKEN), CacheLookup::Absent);
    }

    #[test]
    fn test_hit_within_ttl() {
        let (cache, clock) = cache_with_clock();
        let stored = quote(1.5);
        cache.set(ProviderScope::CoinGeckoBase, TOKEN, Some(stored.clone()));
        clock.advance(Duration::from_secs(59));

        assert_eq!(
            cache.get(ProviderScope::CoinGeckoBase, TOKEN),
            CacheLookup::Hit(stored)
        );
    }

    #[test]
    fn test_negative_entry_is_distinct_from_absent() {
        let (cache, _) = cache_with_clock();
        cache.set(ProviderScope::HeliusSolana, TOKEN, None);

        assert_eq!(cache.get(ProviderScope::HeliusSolana, TOKEN), CacheLookup::Negative);
    }

    #[test]
    fn test_expires_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set(ProviderScope::CoinGeckoBase, TOKEN, Some(quote(1.5)));
        clock.advance(TTL);

        assert_eq!(cache.get(ProviderScope::CoinGeckoBase, TOKEN), CacheLookup::Absent);
        // expired entry is removed on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_scopes_do_not_mix() {
        let (cache, _) = cache_with_clock();
        cache.set(ProviderScope::HeliusSolana, TOKEN, Some(quote(2.0)));

        assert_eq!(cache.get(ProviderScope::CoinGeckoSolana, TOKEN), CacheLookup::Absent);
    }

    #[test]
    fn test_evm_keys_are_case_insensitive() {
        let (cache, _) = cache_with_clock();
        cache.set(
            ProviderScope::AlchemyBase,
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
            None,
        );

        assert_eq!(cache.get(ProviderScope::AlchemyBase, TOKEN), CacheLookup::Negative);
    }

    #[test]
    fn test_set_overwrites_and_restamps() {
        let (cache, clock) = cache_with_clock();
        cache.set(ProviderScope::CoinGeckoBase, TOKEN, None);
        clock.advance(Duration::from_secs(50));
        cache.set(ProviderScope::CoinGeckoBase, TOKEN, Some(quote(3.0)));
        clock.advance(Duration::from_secs(50));

        assert!(matches!(
            cache.get(ProviderScope::CoinGeckoBase, TOKEN),
            CacheLookup::Hit(q) if q.price_usd() == 3.0
        ));
    }
}
