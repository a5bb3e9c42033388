use std::collections::HashMap;

use serde::Deserialize;

#[derive(Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
pub struct OverpassElement {
    pub lat: f64,
    pub lon: f64,
    // Free text tags, absent on untagged nodes
    #[serde(default)]
    pub tags: HashMap<String, String>,
}
