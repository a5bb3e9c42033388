use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::geocode::GeocodedPlace;

pub const DEFAULT_CENTER: [f64; 2] = [52.5200, 13.4050];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub author: String,
    pub place: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug)]
pub struct Session {
    // [lat, lng]
    pub map_center: [f64; 2],
    pub search_marker: Option<GeocodedPlace>,
    // Keyed by place name
    pub reviews: HashMap<String, Vec<Review>>,
    pub recommendations: Vec<Recommendation>,
    pub messages: Vec<ChatMessage>,
    last_seen: Instant,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            map_center: DEFAULT_CENTER,
            search_marker: None,
            reviews: HashMap::new(),
            recommendations: vec![],
            messages: vec![],
            last_seen: Instant::now(),
        }
    }
}

impl Session {
    /// Centre the map on a search result and mark it
    pub fn move_to(&mut self, place: GeocodedPlace) {
        self.map_center = [place.lat, place.lng];
        self.search_marker = Some(place);
    }

    pub fn add_review(&mut self, place: &str, review: Review) {
        self.reviews
            .entry(place.to_string())
            .or_default()
            .push(review);
    }
}

/// In-memory sessions, pruned once idle longer than `ttl`
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Start a new session, pruning any that have gone idle
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_seen.elapsed() < self.ttl);
        if sessions.len() < before {
            debug!("pruned {} idle sessions", before - sessions.len());
        }
        sessions.insert(id, Session::default());
        info!("session {id} created, {} live", sessions.len());
        id
    }

    /// End a session. Returns false when it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("session {id} ended");
        }
        removed
    }

    /// Run `f` against a live session, refreshing its idle timer
    pub async fn with_session<T, F>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        if session.last_seen.elapsed() >= self.ttl {
            sessions.remove(&id);
            return None;
        }
        session.last_seen = Instant::now();
        Some(f(session))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
