use color_eyre::eyre;
use color_eyre::eyre::eyre;
use geojson::JsonObject;
use serde::{Deserialize, Serialize};

use super::place::{Category, DisplayPlace};
use crate::courses::{CourseStop, StopKind};

/// Properties attached to a place marker
#[derive(Serialize, Deserialize)]
pub struct PlaceProperties {
    pub name: String,
    pub category: Category,
    pub label: String,
    pub link: String,
    pub marker_color: String,
}

impl From<&DisplayPlace> for PlaceProperties {
    fn from(place: &DisplayPlace) -> Self {
        PlaceProperties {
            name: place.name.clone(),
            category: place.category,
            label: place.label.clone(),
            link: place.external_link.clone(),
            marker_color: place.marker_color().to_string(),
        }
    }
}

/// Properties attached to a course route line
#[derive(Serialize, Deserialize)]
pub struct RouteProperties {
    pub title: String,
    //Walking distance in metres
    pub distance: f64,
}

/// Properties attached to a course stop
#[derive(Serialize, Deserialize)]
pub struct StopProperties {
    pub seq: usize,
    pub name: String,
    pub kind: StopKind,
    pub desc: String,
}

impl StopProperties {
    pub fn new(seq: usize, stop: &CourseStop) -> Self {
        StopProperties {
            seq,
            name: stop.name.to_string(),
            kind: stop.kind,
            desc: stop.desc.to_string(),
        }
    }
}

fn into_json_object<T: Serialize>(value: T) -> Result<JsonObject, eyre::Error> {
    let value = serde_json::to_value(value)?;
    let properties = value
        .as_object()
        .ok_or(eyre!("Couldn't create object for properties"))?;
    Ok(properties.to_owned())
}

/// For converting properties to geojson properties
impl TryInto<JsonObject> for PlaceProperties {
    type Error = eyre::Error;

    fn try_into(self) -> Result<JsonObject, Self::Error> {
        into_json_object(self)
    }
}

impl TryInto<JsonObject> for RouteProperties {
    type Error = eyre::Error;

    fn try_into(self) -> Result<JsonObject, Self::Error> {
        into_json_object(self)
    }
}

impl TryInto<JsonObject> for StopProperties {
    type Error = eyre::Error;

    fn try_into(self) -> Result<JsonObject, Self::Error> {
        into_json_object(self)
    }
}
