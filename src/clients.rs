use std::time::Duration;

use color_eyre::eyre::Result;

use crate::config::Config;

const USER_AGENT: &str = "BerlinApp/1.0";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(20);

/// Http client plus the upstream endpoints it talks to
#[derive(Clone)]
pub struct Clients {
    pub http: reqwest::Client,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub exchange_url: String,
    pub weather_url: String,
    pub gemini_url: String,
    pub gemini_api_key: Option<String>,
}

impl Clients {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        Ok(Clients {
            http,
            overpass_url: config.overpass_url.clone(),
            nominatim_url: config.nominatim_url.trim_end_matches('/').to_string(),
            exchange_url: config.exchange_url.clone(),
            weather_url: config.weather_url.clone(),
            gemini_url: config.gemini_url.trim_end_matches('/').to_string(),
            gemini_api_key: config.gemini_api_key.clone(),
        })
    }

    #[cfg(test)]
    pub fn for_mock(base: &str) -> Self {
        Clients::new(&Config::for_mock(base)).unwrap()
    }
}
