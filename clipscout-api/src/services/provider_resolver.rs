//! Watch-provider resolution across fallback regions
//!
//! Regions are tried in order `[preferred, US, GB, IN]`. A region without
//! data (or whose lookup fails) is skipped. For the first region with data the
//! generic watch-page link is recorded and every subscription provider whose
//! name matches a known platform fills that platform's slot. Scanning stops
//! once any named platform slot is filled; the watch-page slot alone does not
//! stop it. A filled slot is never overwritten.

use crate::services::tmdb_client::{MediaType, RegionProviders};
use crate::services::traits::WatchProviderSource;

/// Regions tried after the preferred one
pub const FALLBACK_REGIONS: [&str; 3] = ["US", "GB", "IN"];

/// Named streaming platforms with a slot of their own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingPlatform {
    Netflix,
    Prime,
    Hulu,
    Disney,
}

impl StreamingPlatform {
    /// Match a provider display name, case-insensitively
    pub fn from_provider_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("netflix") {
            Some(Self::Netflix)
        } else if name.contains("prime") || name.contains("amazon") {
            Some(Self::Prime)
        } else if name.contains("hulu") {
            Some(Self::Hulu)
        } else if name.contains("disney") {
            Some(Self::Disney)
        } else {
            None
        }
    }
}

/// Resolved provider slots for one metadata item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderLinks {
    pub netflix: Option<String>,
    pub prime: Option<String>,
    pub hulu: Option<String>,
    pub disney: Option<String>,
    /// Generic watch page of the last region with data
    pub watch_page: Option<String>,
}

impl ProviderLinks {
    /// True once at least one named platform slot is filled
    pub fn has_platform(&self) -> bool {
        self.netflix.is_some() || self.prime.is_some() || self.hulu.is_some() || self.disney.is_some()
    }

    fn slot_mut(&mut self, platform: StreamingPlatform) -> &mut Option<String> {
        match platform {
            StreamingPlatform::Netflix => &mut self.netflix,
            StreamingPlatform::Prime => &mut self.prime,
            StreamingPlatform::Hulu => &mut self.hulu,
            StreamingPlatform::Disney => &mut self.disney,
        }
    }

    /// Fold one region's provider data into the slots
    pub fn apply_region(&mut self, data: &RegionProviders) {
        let page = data.link.clone();
        self.watch_page = page.clone();

        for provider in &data.flatrate {
            let Some(platform) = StreamingPlatform::from_provider_name(&provider.provider_name)
            else {
                continue;
            };
            let slot = self.slot_mut(platform);
            if slot.is_none() {
                *slot = page.clone();
            }
        }
    }
}

/// Ordered region list for a preferred region
///
/// Repeats are kept; a repeated region just re-reads the same data.
pub fn fallback_regions(preferred: &str) -> Vec<String> {
    std::iter::once(preferred)
        .chain(FALLBACK_REGIONS)
        .map(str::to_string)
        .collect()
}

/// Walks the fallback regions for one item
pub struct ProviderResolver<'a> {
    source: &'a dyn WatchProviderSource,
    preferred_region: &'a str,
}

impl<'a> ProviderResolver<'a> {
    pub fn new(source: &'a dyn WatchProviderSource, preferred_region: &'a str) -> Self {
        Self {
            source,
            preferred_region,
        }
    }

    pub async fn resolve(&self, item_id: u64, media_type: MediaType) -> ProviderLinks {
        let mut links = ProviderLinks::default();

        for region in fallback_regions(self.preferred_region) {
            let data = match self
                .source
                .watch_providers(item_id, media_type, &region)
                .await
            {
                Ok(Some(data)) => data,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(
                        item_id,
                        media_type = %media_type,
                        region = %region,
                        error = %e,
                        "Watch provider lookup failed"
                    );
                    continue;
                }
            };

            links.apply_region(&data);

            if links.has_platform() {
                tracing::debug!(item_id, region = %region, "Streaming providers resolved");
                break;
            }
        }

        links
    }
}
