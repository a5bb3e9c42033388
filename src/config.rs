use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use color_eyre::eyre::{Result, WrapErr};

#[derive(Clone, Debug)]
pub struct Config {
    pub bind: SocketAddr,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub exchange_url: String,
    pub weather_url: String,
    pub gemini_url: String,
    pub gemini_api_key: Option<String>,
    pub crime_csv: PathBuf,
    pub cache_ttl: Duration,
    pub session_ttl: Duration,
    // Metres around the map centre searched for places
    pub search_radius: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            overpass_url: String::from("https://overpass-api.de/api/interpreter"),
            nominatim_url: String::from("https://nominatim.openstreetmap.org"),
            exchange_url: String::from("https://api.exchangerate-api.com/v4/latest/EUR"),
            weather_url: String::from("https://api.open-meteo.com/v1/forecast"),
            gemini_url: String::from("https://generativelanguage.googleapis.com"),
            gemini_api_key: None,
            crime_csv: PathBuf::from("Berlin_crimes.csv"),
            cache_ttl: Duration::from_secs(600),
            session_ttl: Duration::from_secs(3600),
            search_radius: 3000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, falling back to defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string = |key: &str, default: String| lookup(key).unwrap_or(default);
        Ok(Config {
            bind: parsed(&lookup, "BERLIN_GUIDE_BIND")?.unwrap_or(defaults.bind),
            overpass_url: string("BERLIN_GUIDE_OVERPASS_URL", defaults.overpass_url),
            nominatim_url: string("BERLIN_GUIDE_NOMINATIM_URL", defaults.nominatim_url),
            exchange_url: string("BERLIN_GUIDE_EXCHANGE_URL", defaults.exchange_url),
            weather_url: string("BERLIN_GUIDE_WEATHER_URL", defaults.weather_url),
            gemini_url: string("BERLIN_GUIDE_GEMINI_URL", defaults.gemini_url),
            gemini_api_key: lookup("BERLIN_GUIDE_GEMINI_API_KEY").filter(|key| !key.is_empty()),
            crime_csv: lookup("BERLIN_GUIDE_CRIME_CSV")
                .map(PathBuf::from)
                .unwrap_or(defaults.crime_csv),
            cache_ttl: parsed(&lookup, "BERLIN_GUIDE_CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            session_ttl: parsed(&lookup, "BERLIN_GUIDE_SESSION_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),
            search_radius: parsed(&lookup, "BERLIN_GUIDE_SEARCH_RADIUS_M")?
                .unwrap_or(defaults.search_radius),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Point every upstream at the same base url, for tests against a mock server
    pub fn for_mock(base: &str) -> Self {
        Config {
            overpass_url: format!("{base}/api/interpreter"),
            nominatim_url: base.to_string(),
            exchange_url: format!("{base}/v4/latest/EUR"),
            weather_url: format!("{base}/v1/forecast"),
            gemini_url: base.to_string(),
            gemini_api_key: Some(String::from("test-key")),
            ..Config::default()
        }
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .parse::<T>()
                .wrap_err_with(|| format!("Invalid value for {key}: {value}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.search_radius, 3000);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.cache_ttl, Duration::from_secs(600));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BERLIN_GUIDE_BIND", "127.0.0.1:8080"),
            ("BERLIN_GUIDE_GEMINI_API_KEY", "secret"),
            ("BERLIN_GUIDE_SESSION_TTL_SECS", "60"),
            ("BERLIN_GUIDE_CRIME_CSV", "/data/crimes.csv"),
        ]))
        .unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:8080");
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.crime_csv, PathBuf::from("/data/crimes.csv"));
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = Config::from_lookup(lookup(&[("BERLIN_GUIDE_SEARCH_RADIUS_M", "far")]))
            .unwrap_err();
        assert!(err.to_string().contains("BERLIN_GUIDE_SEARCH_RADIUS_M"));
    }
}
