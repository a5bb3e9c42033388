use color_eyre::eyre::Result;
use tracing::{debug, instrument};

use crate::{
    clients::Clients,
    types::{
        overpass::OverpassResponse,
        place::{Category, PoiRecord},
    },
};

pub fn overpass_query(category: Category, lat: f64, lng: f64, radius_m: u32) -> String {
    format!(
        r#"
    [out:json];
    (
      node{}(around:{radius_m},{lat},{lng});
    );
    out body;
    "#,
        category.overpass_tag()
    )
}

/// Raw nodes of `category` within `radius_m` metres of the given point
#[instrument(skip(clients))]
pub async fn try_fetch_pois(
    clients: &Clients,
    category: Category,
    lat: f64,
    lng: f64,
    radius_m: u32,
) -> Result<Vec<PoiRecord>> {
    let response = clients
        .http
        .post(&clients.overpass_url)
        .body(overpass_query(category, lat, lng, radius_m))
        .send()
        .await?
        .error_for_status()?
        .json::<OverpassResponse>()
        .await?;
    debug!("overpass returned {} elements", response.elements.len());
    Ok(response
        .elements
        .into_iter()
        .map(PoiRecord::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_string_contains, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    #[test]
    fn query_uses_category_tag_and_radius() {
        let query = overpass_query(Category::Tourism, 52.52, 13.405, 3000);
        assert!(query.contains(r#"node["tourism"~"attraction|museum|artwork|viewpoint"](around:3000,52.52,13.405);"#));
        assert!(query.contains("[out:json];"));
        assert!(query.contains("out body;"));
    }

    #[tokio::test]
    async fn parses_nodes_with_and_without_tags() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .and(body_string_contains(r#"["amenity"="restaurant"]"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "elements": [
                    {"type": "node", "id": 1, "lat": 52.5, "lon": 13.4,
                     "tags": {"name": "Kim's", "cuisine": "korean"}},
                    {"type": "node", "id": 2, "lat": 52.6, "lon": 13.5}
                ]
            })))
            .mount(&server)
            .await;

        let clients = Clients::for_mock(&server.uri());
        let records = try_fetch_pois(&clients, Category::Restaurant, 52.52, 13.405, 3000)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), Some("Kim's"));
        assert_eq!(records[0].lng, 13.4);
        assert!(records[1].tags.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let clients = Clients::for_mock(&server.uri());
        assert!(try_fetch_pois(&clients, Category::Hotel, 52.52, 13.405, 3000)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .mount(&server)
            .await;

        let clients = Clients::for_mock(&server.uri());
        assert!(try_fetch_pois(&clients, Category::Tourism, 52.52, 13.405, 3000)
            .await
            .is_err());
    }
}
