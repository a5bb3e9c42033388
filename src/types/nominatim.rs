use serde::Deserialize;

/// A single hit from the nominatim search endpoint. Coordinates come back as strings.
#[derive(Deserialize, Debug)]
pub struct NominatimSearchPlace {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}
