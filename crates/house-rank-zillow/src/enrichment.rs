//! Freshness-aware enrichment: decides, per sub-resource, whether to serve
//! the cached document, refresh from upstream, or degrade to stale data.
//!
//! Pricing and property detail are cached and aged independently. There is
//! deliberately no cross-request coordination: two concurrent requests for
//! the same expired listing may both fetch and both persist
//! (last-write-wins), which is acceptable for a read-mostly cache of
//! idempotent fetches.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::Value;
use tracing::{debug, info, warn};

use house_rank_core::{PropertyClient, Result, Storage};

/// Base validity window for a cached sub-resource.
const CACHE_TTL_DAYS: i64 = 2;
/// Upper bound on the per-check jitter added to the window.
const MAX_JITTER_MINUTES: i64 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubResource {
    Pricing,
    Property,
}

impl SubResource {
    fn label(self) -> &'static str {
        match self {
            SubResource::Pricing => "pricing",
            SubResource::Property => "property",
        }
    }
}

/// Outcome of consulting the cache for one sub-resource.
enum CacheState {
    /// Blob present and inside its validity window.
    Fresh(Value),
    /// No usable blob, or the window has passed; carries the stale blob
    /// (if any) as the degradation fallback.
    Expired(Option<Value>),
}

#[derive(Clone)]
pub struct Enricher {
    storage: Arc<dyn Storage>,
    upstream: Arc<dyn PropertyClient>,
}

impl Enricher {
    pub fn new(storage: Arc<dyn Storage>, upstream: Arc<dyn PropertyClient>) -> Self {
        Self { storage, upstream }
    }

    /// Pricing/tax document for the listing, cached or fresh.
    pub async fn pricing(&self, zpid: &str) -> Result<Value> {
        self.resolve(zpid, SubResource::Pricing).await
    }

    /// Property-detail document for the listing, cached or fresh.
    pub async fn property(&self, zpid: &str) -> Result<Value> {
        self.resolve(zpid, SubResource::Property).await
    }

    async fn resolve(&self, zpid: &str, sub: SubResource) -> Result<Value> {
        let stale = match self.consult_cache(zpid, sub).await {
            CacheState::Fresh(doc) => {
                info!(zpid, sub = sub.label(), "cache hit");
                return Ok(doc);
            }
            CacheState::Expired(stale) => stale,
        };

        info!(zpid, sub = sub.label(), "requesting upstream");
        let fetched = match sub {
            SubResource::Pricing => self.upstream.price_tax(zpid).await,
            SubResource::Property => self.upstream.full_render(zpid).await,
        };

        match fetched {
            Ok(doc) => {
                // A failed write must not fail the read; the result is
                // inspected for logging only.
                let persisted = match sub {
                    SubResource::Pricing => self.storage.update_house_pricing(zpid, &doc).await,
                    SubResource::Property => self.storage.update_house_property(zpid, &doc).await,
                };
                if let Err(e) = persisted {
                    warn!(zpid, sub = sub.label(), error = %e, "error saving fetched info");
                }
                Ok(doc)
            }
            Err(e) => match stale {
                Some(doc) => {
                    warn!(zpid, sub = sub.label(), error = %e, "upstream failed, serving stale cache");
                    Ok(doc)
                }
                None => Err(e),
            },
        }
    }

    async fn consult_cache(&self, zpid: &str, sub: SubResource) -> CacheState {
        let house = match self.storage.house_by_zpid(zpid).await {
            Ok(Some(house)) => house,
            Ok(None) => return CacheState::Expired(None),
            Err(e) => {
                // A cache that cannot be read is a cache miss, nothing more.
                debug!(zpid, sub = sub.label(), error = %e, "cache read failed");
                return CacheState::Expired(None);
            }
        };
        let (blob, updated_at) = match sub {
            SubResource::Pricing => (house.zillow_pricing_info, house.zillow_pricing_updated_at),
            SubResource::Property => {
                (house.zillow_property_info, house.zillow_property_updated_at)
            }
        };
        match (blob, updated_at) {
            (Some(doc), Some(at)) if Utc::now() < at + validity_window() => CacheState::Fresh(doc),
            (doc, _) => CacheState::Expired(doc),
        }
    }
}

/// Two days plus 0-120 minutes, re-drawn on every check so listings cached
/// in the same burst do not all expire at the same instant.
fn validity_window() -> Duration {
    let jitter = rand::rng().random_range(0..MAX_JITTER_MINUTES);
    Duration::days(CACHE_TTL_DAYS) + Duration::minutes(jitter)
}
