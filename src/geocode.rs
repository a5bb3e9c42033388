use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{clients::Clients, types::nominatim::NominatimSearchPlace};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GeocodedPlace {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

#[instrument(skip(clients))]
pub async fn try_resolve(clients: &Clients, query: &str) -> Result<Option<GeocodedPlace>> {
    let places = clients
        .http
        .get(format!("{}/search", clients.nominatim_url))
        .query(&[("q", query), ("format", "json"), ("limit", "1")])
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<NominatimSearchPlace>>()
        .await?;
    places
        .into_iter()
        .next()
        .map(|place| -> Result<GeocodedPlace> {
            Ok(GeocodedPlace {
                lat: place.lat.parse()?,
                lng: place.lon.parse()?,
                display_name: place.display_name,
            })
        })
        .transpose()
}

/// Resolve a free text place name, treating any upstream failure as not found
pub async fn resolve(clients: &Clients, query: &str) -> Option<GeocodedPlace> {
    try_resolve(clients, query).await.unwrap_or_else(|err| {
        warn!("geocoding {query:?} failed: {err}");
        None
    })
}

/// Searches are scoped to the city
pub async fn resolve_in_berlin(clients: &Clients, query: &str) -> Option<GeocodedPlace> {
    resolve(clients, &format!("{} Berlin", query.trim())).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    #[tokio::test]
    async fn resolves_first_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Kreuzberg Berlin"))
            .and(query_param("format", "json"))
            .and(query_param("limit", "1"))
            .and(header("user-agent", "BerlinApp/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"place_id": 1, "lat": "52.4986", "lon": "13.4030",
                 "display_name": "Kreuzberg, Berlin, Deutschland"}
            ])))
            .mount(&server)
            .await;

        let clients = Clients::for_mock(&server.uri());
        let place = resolve_in_berlin(&clients, "Kreuzberg").await.unwrap();
        assert_eq!(place.lat, 52.4986);
        assert_eq!(place.lng, 13.403);
        assert_eq!(place.display_name, "Kreuzberg, Berlin, Deutschland");
    }

    #[tokio::test]
    async fn no_hits_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let clients = Clients::for_mock(&server.uri());
        assert_eq!(resolve(&clients, "Atlantis").await, None);
    }

    #[tokio::test]
    async fn bad_coordinates_are_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "north", "lon": "13.4", "display_name": "Nowhere"}
            ])))
            .mount(&server)
            .await;

        let clients = Clients::for_mock(&server.uri());
        assert!(try_resolve(&clients, "Nowhere").await.is_err());
        assert_eq!(resolve(&clients, "Nowhere").await, None);
    }

    #[tokio::test]
    async fn server_error_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let clients = Clients::for_mock(&server.uri());
        assert_eq!(resolve(&clients, "Mitte").await, None);
    }
}
