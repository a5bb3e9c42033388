use geojson::FeatureCollection;
use serde::Serialize;

use crate::courses::{Course, CourseStop};

#[derive(Serialize, Debug)]
pub struct CourseSummary {
    pub index: usize,
    pub title: &'static str,
    pub stops: usize,
    //Walking distance in metres
    pub distance: f64,
}

impl CourseSummary {
    pub fn new(index: usize, course: &'static Course) -> Self {
        CourseSummary {
            index,
            title: course.title,
            stops: course.stops.len(),
            distance: course.walking_distance(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct CourseDetail {
    pub title: &'static str,
    pub stops: &'static [CourseStop],
    pub distance: f64,
    pub geo_json: FeatureCollection,
}
