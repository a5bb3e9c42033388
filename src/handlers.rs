use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use futures::join;
use tower_http::cors::CorsLayer;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    assistant,
    courses::{self, COURSES},
    crime::{cached_table, CrimeTypeTotal, DistrictTotal},
    geocode::{self, GeocodedPlace},
    map_geo::{course_feature_collection, places_feature_collection},
    net::response::{ResponseError, Result},
    session::{ChatMessage, Recommendation, Review, Role, Session, DEFAULT_CENTER},
    state::{AppState, SharedState},
    travel_info::{self, Overview},
    types::{
        dto::{
            board::{
                ChatReply, ChatRequest, NewRecommendation, NewReview, PlaceReviews,
                ReviewsQuery, SearchRequest, SessionCreated,
            },
            course::{CourseDetail, CourseSummary},
            places::{parse_cuisine, GeocodeQuery, MapQuery, MapView, PlacesQuery},
        },
        place::{Category, CuisineFilter, DisplayPlace},
    },
};

const NOT_FOUND_PLACE: &str = "장소를 찾을 수 없습니다.";

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/overview", get(overview))
        .route("/places", get(list_places))
        .route("/geocode", get(find_place))
        .route("/courses", get(list_courses))
        .route("/courses/:index", get(get_course))
        .route("/crime/districts", get(crime_districts))
        .route("/crime/districts/:district", get(crime_district_breakdown))
        .route("/crime/types", get(crime_types))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", delete(end_session))
        .route("/sessions/:id/search", post(search))
        .route("/sessions/:id/map", get(map_view))
        .route("/sessions/:id/reviews", get(list_reviews).post(add_review))
        .route(
            "/sessions/:id/recommendations",
            get(list_recommendations).post(add_recommendation),
        )
        .route("/sessions/:id/chat", get(chat_history).post(chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn with_session<T, F>(state: &AppState, id: Uuid, f: F) -> Result<T>
where
    F: FnOnce(&mut Session) -> T,
{
    state
        .sessions
        .with_session(id, f)
        .await
        .ok_or(ResponseError::not_found("No session with this id"))
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(ResponseError::bad_request(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

async fn overview(State(state): State<SharedState>) -> Json<Overview> {
    let (eur_krw, weather) = join!(
        travel_info::exchange_rate(&state.clients, &state.rate_cache),
        travel_info::weather(&state.clients, &state.weather_cache)
    );
    Json(Overview { eur_krw, weather })
}

#[instrument(skip(state))]
async fn list_places(
    State(state): State<SharedState>,
    Query(query): Query<PlacesQuery>,
) -> Result<Json<Vec<DisplayPlace>>> {
    let cuisine_filter = query
        .cuisine
        .as_deref()
        .map(parse_cuisine)
        .transpose()
        .map_err(|err| ResponseError::bad_request(err.to_string()))?
        .unwrap_or_default();
    let [lat, lng] = query
        .center(DEFAULT_CENTER)
        .map_err(|err| ResponseError::bad_request(err.to_string()))?;
    let radius = query.radius.unwrap_or(state.search_radius);
    Ok(Json(
        state
            .places(query.category, lat, lng, radius, &cuisine_filter)
            .await,
    ))
}

async fn find_place(
    State(state): State<SharedState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<GeocodedPlace>> {
    let q = required("q", &query.q)?;
    geocode::resolve(&state.clients, &q)
        .await
        .map(Json)
        .ok_or(ResponseError::not_found(NOT_FOUND_PLACE))
}

async fn list_courses() -> Json<Vec<CourseSummary>> {
    Json(
        COURSES
            .iter()
            .enumerate()
            .map(|(index, course)| CourseSummary::new(index, course))
            .collect(),
    )
}

async fn get_course(Path(index): Path<usize>) -> Result<Json<CourseDetail>> {
    let course =
        courses::course(index).ok_or(ResponseError::not_found("No course with this index"))?;
    Ok(Json(CourseDetail {
        title: course.title,
        stops: course.stops,
        distance: course.walking_distance(),
        geo_json: course_feature_collection(course)?,
    }))
}

async fn crime_districts(State(state): State<SharedState>) -> Json<Vec<DistrictTotal>> {
    Json(
        cached_table(&state.crime_csv, &state.crime_cache)
            .await
            .map(|table| table.district_totals())
            .unwrap_or_default(),
    )
}

async fn crime_types(State(state): State<SharedState>) -> Json<Vec<CrimeTypeTotal>> {
    Json(
        cached_table(&state.crime_csv, &state.crime_cache)
            .await
            .map(|table| table.crime_type_totals())
            .unwrap_or_default(),
    )
}

async fn crime_district_breakdown(
    State(state): State<SharedState>,
    Path(district): Path<String>,
) -> Result<Json<Vec<CrimeTypeTotal>>> {
    cached_table(&state.crime_csv, &state.crime_cache)
        .await
        .and_then(|table| table.district_breakdown(&district))
        .map(Json)
        .ok_or(ResponseError::not_found("No crime data for this district"))
}

async fn create_session(State(state): State<SharedState>) -> (StatusCode, Json<SessionCreated>) {
    let id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { id }))
}

async fn end_session(State(state): State<SharedState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ResponseError::not_found("No session with this id"))
    }
}

#[instrument(skip(state, request))]
async fn search(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<GeocodedPlace>> {
    let query = required("query", &request.query)?;
    with_session(&state, id, |_| ()).await?;
    let place = geocode::resolve_in_berlin(&state.clients, &query)
        .await
        .ok_or(ResponseError::not_found(NOT_FOUND_PLACE))?;
    info!("moving map to {}", place.display_name);
    let moved = place.clone();
    with_session(&state, id, move |session| session.move_to(moved)).await?;
    Ok(Json(place))
}

#[instrument(skip(state))]
async fn map_view(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MapQuery>,
) -> Result<Json<MapView>> {
    let cuisine_filter = query
        .cuisine_filter()
        .map_err(|err| ResponseError::bad_request(err.to_string()))?;
    let (center, search_marker) = with_session(&state, id, |session| {
        (session.map_center, session.search_marker.clone())
    })
    .await?;
    let [lat, lng] = center;
    let radius = state.search_radius;

    let crime = async {
        if query.show_crime.unwrap_or(true) {
            Some(
                cached_table(&state.crime_csv, &state.crime_cache)
                    .await
                    .map(|table| table.district_totals())
                    .unwrap_or_default(),
            )
        } else {
            None
        }
    };
    let restaurants = async {
        match &cuisine_filter {
            Some(filter) => {
                state
                    .places(Category::Restaurant, lat, lng, radius, filter)
                    .await
            }
            None => vec![],
        }
    };
    let layer = |category: Category, enabled: bool| {
        let state = &state;
        async move {
            if enabled {
                state
                    .places(category, lat, lng, radius, &CuisineFilter::All)
                    .await
            } else {
                vec![]
            }
        }
    };
    let (crime, restaurants, hotels, sights) = join!(
        crime,
        restaurants,
        layer(Category::Hotel, query.show_hotel.unwrap_or(false)),
        layer(Category::Tourism, query.show_tour.unwrap_or(false))
    );
    let places: Vec<DisplayPlace> = restaurants
        .into_iter()
        .chain(hotels)
        .chain(sights)
        .collect();
    Ok(Json(MapView {
        center,
        search_marker,
        crime,
        places: places_feature_collection(&places)?,
    }))
}

async fn list_reviews(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReviewsQuery>,
) -> Result<Json<Vec<PlaceReviews>>> {
    let mut reviews = with_session(&state, id, |session| match &query.place {
        Some(place) => vec![(
            place.clone(),
            session.reviews.get(place).cloned().unwrap_or_default(),
        )],
        None => session
            .reviews
            .iter()
            .map(|(place, reviews)| (place.clone(), reviews.clone()))
            .collect(),
    })
    .await?;
    reviews.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(Json(
        reviews
            .into_iter()
            .map(|(place, reviews)| PlaceReviews::new(place, reviews))
            .collect(),
    ))
}

async fn add_review(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(review): Json<NewReview>,
) -> Result<(StatusCode, Json<PlaceReviews>)> {
    let place = required("place", &review.place)?;
    let author = required("author", &review.author)?;
    if !(1..=5).contains(&review.rating) {
        return Err(ResponseError::with_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            "rating must be between 1 and 5",
        ));
    }
    let reviews = with_session(&state, id, |session| {
        session.add_review(
            &place,
            Review {
                author,
                rating: review.rating,
                comment: review.comment.trim().to_string(),
                created_at: Utc::now(),
            },
        );
        session.reviews[&place].clone()
    })
    .await?;
    Ok((StatusCode::CREATED, Json(PlaceReviews::new(place, reviews))))
}

async fn list_recommendations(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Recommendation>>> {
    // Newest first
    let recommendations: Vec<Recommendation> = with_session(&state, id, |session| {
        session.recommendations.iter().rev().cloned().collect()
    })
    .await?;
    Ok(Json(recommendations))
}

async fn add_recommendation(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewRecommendation>,
) -> Result<(StatusCode, Json<Recommendation>)> {
    let recommendation = Recommendation {
        author: required("author", &request.author)?,
        place: required("place", &request.place)?,
        reason: required("reason", &request.reason)?,
        created_at: Utc::now(),
    };
    let stored = recommendation.clone();
    with_session(&state, id, move |session| session.recommendations.push(stored)).await?;
    Ok((StatusCode::CREATED, Json(recommendation)))
}

async fn chat_history(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>> {
    Ok(Json(
        with_session(&state, id, |session| session.messages.clone()).await?,
    ))
}

#[instrument(skip(state, request))]
async fn chat(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let prompt = required("prompt", &request.prompt)?;
    let question = ChatMessage {
        role: Role::User,
        content: prompt.clone(),
    };
    with_session(&state, id, move |session| session.messages.push(question)).await?;
    let answer = assistant::answer(&state.clients, &prompt).await;
    let reply = ChatMessage {
        role: Role::Assistant,
        content: answer.clone(),
    };
    let messages = with_session(&state, id, move |session| {
        session.messages.push(reply);
        session.messages.clone()
    })
    .await?;
    Ok(Json(ChatReply { answer, messages }))
}
