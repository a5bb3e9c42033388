use color_eyre::eyre::{eyre, Result};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

use crate::{
    crime::DistrictTotal,
    geocode::GeocodedPlace,
    types::place::{Category, CuisineFilter},
};

/// Comma separated cuisine names, e.g. `한식,카페`
pub fn parse_cuisine(raw: &str) -> Result<CuisineFilter> {
    CuisineFilter::parse(raw.split(','))
}

#[derive(Deserialize, Debug)]
pub struct PlacesQuery {
    pub category: Category,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<u32>,
    pub cuisine: Option<String>,
}

impl PlacesQuery {
    pub fn center(&self, fallback: [f64; 2]) -> Result<[f64; 2]> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok([lat, lon]),
            (None, None) => Ok(fallback),
            _ => Err(eyre!("lat and lon must be given together")),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct GeocodeQuery {
    pub q: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct MapQuery {
    pub show_crime: Option<bool>,
    pub show_hotel: Option<bool>,
    pub show_tour: Option<bool>,
    // Absent means every cuisine, empty hides restaurants
    pub cuisine: Option<String>,
}

impl MapQuery {
    /// None when the restaurant layer is switched off
    pub fn cuisine_filter(&self) -> Result<Option<CuisineFilter>> {
        match self.cuisine.as_deref() {
            None => Ok(Some(CuisineFilter::All)),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_cuisine(raw).map(Some),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MapView {
    // [lat, lng]
    pub center: [f64; 2],
    pub search_marker: Option<GeocodedPlace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crime: Option<Vec<DistrictTotal>>,
    pub places: FeatureCollection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::place::CuisineBucket;

    #[test]
    fn absent_cuisine_shows_all_restaurants() {
        let query = MapQuery::default();
        assert_eq!(query.cuisine_filter().unwrap(), Some(CuisineFilter::All));
    }

    #[test]
    fn empty_cuisine_hides_restaurants() {
        let query = MapQuery {
            cuisine: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.cuisine_filter().unwrap(), None);
    }

    #[test]
    fn center_needs_both_coordinates() {
        let query = |lat, lon| PlacesQuery {
            category: Category::Hotel,
            lat,
            lon,
            radius: None,
            cuisine: None,
        };
        assert_eq!(query(None, None).center([1.0, 2.0]).unwrap(), [1.0, 2.0]);
        assert_eq!(query(Some(3.0), Some(4.0)).center([1.0, 2.0]).unwrap(), [3.0, 4.0]);
        assert!(query(Some(3.0), None).center([1.0, 2.0]).is_err());
        assert!(query(None, Some(4.0)).center([1.0, 2.0]).is_err());
    }

    #[test]
    fn comma_separated_cuisines() {
        let filter = parse_cuisine("한식, cafe").unwrap();
        assert_eq!(
            filter,
            CuisineFilter::Only([CuisineBucket::Korean, CuisineBucket::Cafe].into())
        );
        assert!(parse_cuisine("한식,mexican").is_err());
    }
}
