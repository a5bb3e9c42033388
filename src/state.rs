use std::{path::PathBuf, sync::Arc};

use color_eyre::eyre::Result;

use crate::{
    cache::{cache_key, TtlCache},
    classify::classify,
    clients::Clients,
    config::Config,
    crime::CrimeTable,
    overpass::try_fetch_pois,
    session::SessionStore,
    travel_info::CurrentWeather,
    types::place::{Category, CuisineFilter, DisplayPlace, PoiRecord},
};

/// Largest search radius forwarded to overpass, in metres
const MAX_RADIUS_M: u32 = 10_000;

// Four decimal places, roughly 11 m
fn round_coord(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Everything a request handler needs, injected through axum's `State`
pub struct AppState {
    pub clients: Clients,
    pub sessions: SessionStore,
    pub crime_csv: PathBuf,
    pub search_radius: u32,
    pub rate_cache: TtlCache<f64>,
    pub weather_cache: TtlCache<CurrentWeather>,
    pub poi_cache: TtlCache<Arc<Vec<PoiRecord>>>,
    pub crime_cache: TtlCache<Arc<CrimeTable>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(AppState {
            clients: Clients::new(config)?,
            sessions: SessionStore::new(config.session_ttl),
            crime_csv: config.crime_csv.clone(),
            search_radius: config.search_radius,
            rate_cache: TtlCache::new(config.cache_ttl),
            weather_cache: TtlCache::new(config.cache_ttl),
            poi_cache: TtlCache::new(config.cache_ttl),
            crime_cache: TtlCache::new(config.cache_ttl),
        })
    }

    /// Nearby places of one category, classified and filtered. Upstream failures give no
    /// places and are not cached.
    pub async fn places(
        &self,
        category: Category,
        lat: f64,
        lng: f64,
        radius_m: u32,
        cuisine_filter: &CuisineFilter,
    ) -> Vec<DisplayPlace> {
        let (lat, lng) = (round_coord(lat), round_coord(lng));
        let radius_m = radius_m.min(MAX_RADIUS_M);
        let key = cache_key("fetch_pois", &[&category, &lat, &lng, &radius_m]);
        match self
            .poi_cache
            .get_or_try_fetch(key, || async {
                try_fetch_pois(&self.clients, category, lat, lng, radius_m)
                    .await
                    .map(Arc::new)
            })
            .await
        {
            Ok(records) => classify(&records, category, cuisine_filter),
            Err(err) => {
                tracing::warn!("no {category} places around {lat},{lng}: {err}");
                vec![]
            }
        }
    }
}
