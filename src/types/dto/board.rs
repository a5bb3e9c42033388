use serde::{Deserialize, Serialize};

use crate::session::{ChatMessage, Review};

#[derive(Deserialize, Debug)]
pub struct NewReview {
    pub place: String,
    pub author: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Deserialize, Debug)]
pub struct NewRecommendation {
    pub author: String,
    pub place: String,
    pub reason: String,
}

#[derive(Deserialize, Debug)]
pub struct ReviewsQuery {
    pub place: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct PlaceReviews {
    pub place: String,
    pub average_rating: Option<f64>,
    pub reviews: Vec<Review>,
}

impl PlaceReviews {
    pub fn new(place: String, reviews: Vec<Review>) -> Self {
        let average_rating = (!reviews.is_empty()).then(|| {
            reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / reviews.len() as f64
        });
        PlaceReviews {
            place,
            average_rating,
            reviews,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Serialize, Debug)]
pub struct ChatReply {
    pub answer: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Debug)]
pub struct SessionCreated {
    pub id: uuid::Uuid,
}
