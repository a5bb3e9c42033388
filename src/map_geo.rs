use color_eyre::eyre::Result;
use geo::{BoundingRect, VincentyDistance};
use geo_types::{CoordFloat, CoordNum, LineString, MultiPoint, Point, Rect};
use geojson::{Feature, FeatureCollection, Geometry};

use crate::{
    courses::Course,
    types::{
        feature::{PlaceProperties, RouteProperties, StopProperties},
        place::DisplayPlace,
    },
};

//Get the bounding box for a geometry as a vector
pub trait BoundingBox<N> {
    fn bounding_box(&self) -> Option<Vec<N>>;
}

impl<T, N> BoundingBox<N> for T
where
    T: BoundingRect<N>,
    N: CoordNum,
{
    fn bounding_box(&self) -> Option<Vec<N>> {
        let rect: Option<Rect<N>> = self.bounding_rect().into();
        rect.map(|r| vec![r.min().x, r.min().y, r.max().x, r.max().y])
    }
}

/// Calculate distance along all points, excluding point pairs with incalculable distance
pub trait Distance<N> {
    fn distance(&self) -> N;
}

impl<N> Distance<N> for LineString<N>
where
    N: std::iter::Sum + CoordFloat,
    Point<N>: VincentyDistance<N>,
{
    fn distance(&self) -> N {
        self.points()
            .collect::<Vec<Point<N>>>()
            .windows(2)
            .filter_map(|p| p[0].vincenty_distance(&p[1]).ok())
            .sum()
    }
}

impl Course {
    pub fn route(&self) -> LineString<f64> {
        self.stops
            .iter()
            .map(|stop| (stop.lng, stop.lat))
            .collect::<Vec<_>>()
            .into()
    }

    /// Metres walked visiting the stops in order
    pub fn walking_distance(&self) -> f64 {
        self.route().distance()
    }
}

fn point_feature(point: &Point, bbox: Option<Vec<f64>>) -> Feature {
    Feature {
        bbox,
        geometry: Some(Geometry::new(point.into())),
        ..Default::default()
    }
}

/// One point feature per place, for the map's marker layers
pub fn places_feature_collection(places: &[DisplayPlace]) -> Result<FeatureCollection> {
    let points: MultiPoint<f64> = places
        .iter()
        .map(|place| Point::new(place.lng, place.lat))
        .collect();
    let features = places
        .iter()
        .zip(points.iter())
        .map(|(place, point)| -> Result<Feature> {
            Ok(Feature {
                properties: Some(PlaceProperties::from(place).try_into()?),
                ..point_feature(point, None)
            })
        })
        .collect::<Result<Vec<Feature>>>()?;
    Ok(FeatureCollection {
        bbox: points.bounding_box(),
        features,
        foreign_members: None,
    })
}

/// The course route as a line followed by a point for every stop
pub fn course_feature_collection(course: &Course) -> Result<FeatureCollection> {
    let route = course.route();
    let bounding_box = route.bounding_box();
    let line = Feature {
        bbox: bounding_box.to_owned(),
        geometry: Some(Geometry {
            bbox: bounding_box.to_owned(),
            value: (&route).into(),
            foreign_members: None,
        }),
        id: Some(geojson::feature::Id::String(String::from("route"))),
        properties: Some(
            RouteProperties {
                title: course.title.to_string(),
                distance: route.distance(),
            }
            .try_into()?,
        ),
        ..Default::default()
    };
    let stops = course
        .stops
        .iter()
        .enumerate()
        .map(|(seq, stop)| -> Result<Feature> {
            Ok(Feature {
                properties: Some(StopProperties::new(seq, stop).try_into()?),
                ..point_feature(&Point::new(stop.lng, stop.lat), None)
            })
        });
    Ok(FeatureCollection {
        bbox: bounding_box,
        features: std::iter::once(Ok(line))
            .chain(stops)
            .collect::<Result<Vec<Feature>>>()?,
        foreign_members: None,
    })
}
