use color_eyre::eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{
    cache::{cache_key, TtlCache},
    clients::Clients,
};

pub const FALLBACK_EUR_KRW: f64 = 1450.0;
pub const BERLIN_LAT: f64 = 52.52;
pub const BERLIN_LNG: f64 = 13.41;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub weathercode: i64,
}

impl Default for CurrentWeather {
    fn default() -> Self {
        CurrentWeather {
            temperature: 15.0,
            weathercode: 0,
        }
    }
}

#[derive(Deserialize)]
struct RatesResponse {
    rates: std::collections::HashMap<String, f64>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

/// Headline numbers shown above the map
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Overview {
    pub eur_krw: f64,
    pub weather: CurrentWeather,
}

#[instrument(skip(clients))]
pub async fn try_exchange_rate(clients: &Clients) -> Result<f64> {
    let response = clients
        .http
        .get(&clients.exchange_url)
        .send()
        .await?
        .error_for_status()?
        .json::<RatesResponse>()
        .await?;
    response
        .rates
        .get("KRW")
        .copied()
        .ok_or(eyre!("No KRW rate in response"))
}

#[instrument(skip(clients))]
pub async fn try_weather(clients: &Clients) -> Result<CurrentWeather> {
    let response = clients
        .http
        .get(&clients.weather_url)
        .query(&[
            ("latitude", BERLIN_LAT.to_string()),
            ("longitude", BERLIN_LNG.to_string()),
            ("current_weather", String::from("true")),
        ])
        .send()
        .await?
        .error_for_status()?
        .json::<ForecastResponse>()
        .await?;
    Ok(response.current_weather)
}

/// EUR to KRW, falling back to a fixed rate
pub async fn exchange_rate(clients: &Clients, cache: &TtlCache<f64>) -> f64 {
    let key = cache_key("exchange_rate", &[]);
    cache
        .get_or_try_fetch(key, || try_exchange_rate(clients))
        .await
        .unwrap_or_else(|err| {
            warn!("exchange rate unavailable: {err}");
            FALLBACK_EUR_KRW
        })
}

pub async fn weather(clients: &Clients, cache: &TtlCache<CurrentWeather>) -> CurrentWeather {
    let key = cache_key("weather", &[&BERLIN_LAT, &BERLIN_LNG]);
    cache
        .get_or_try_fetch(key, || try_weather(clients))
        .await
        .unwrap_or_else(|err| {
            warn!("weather unavailable: {err}");
            CurrentWeather::default()
        })
}
