use crate::types::place::{Category, CuisineBucket, CuisineFilter, DisplayPlace, PoiRecord};

const SEARCH_URL: &str = "https://www.google.com/search?q=";
const RESTAURANT_NOUN: &str = "음식점";
const HOTEL_LABEL: &str = "숙소";
const TOURISM_LABEL: &str = "관광지";

/// Turn raw poi records into display places.
///
/// Records without a name are dropped. Restaurants are bucketed by their `cuisine` tag and
/// then filtered; hotels and tourism spots are never filtered. Input order is kept.
pub fn classify(
    records: &[PoiRecord],
    category: Category,
    cuisine_filter: &CuisineFilter,
) -> Vec<DisplayPlace> {
    records
        .iter()
        .filter_map(|record| {
            let name = record.name()?;
            let cuisine = record.cuisine().unwrap_or("general").to_lowercase();
            let bucket = match category {
                Category::Restaurant => {
                    let bucket = detect_bucket(&cuisine);
                    if !cuisine_filter.admits(bucket) {
                        return None;
                    }
                    Some(bucket)
                }
                Category::Hotel | Category::Tourism => None,
            };
            Some(DisplayPlace {
                name: name.to_string(),
                lat: record.lat,
                lng: record.lng,
                category,
                label: label(category, bucket),
                bucket,
                external_link: external_link(name),
            })
        })
        .collect()
}

/// First bucket with a keyword contained in `cuisine`, which must already be lowercase
pub fn detect_bucket(cuisine: &str) -> CuisineBucket {
    CuisineBucket::PRIORITY
        .into_iter()
        .find(|bucket| {
            bucket
                .keywords()
                .iter()
                .any(|keyword| cuisine.contains(keyword))
        })
        .unwrap_or(CuisineBucket::Other)
}

fn label(category: Category, bucket: Option<CuisineBucket>) -> String {
    match category {
        Category::Restaurant => format!(
            "{RESTAURANT_NOUN} ({})",
            bucket.unwrap_or(CuisineBucket::Other)
        ),
        Category::Hotel => HOTEL_LABEL.to_string(),
        Category::Tourism => TOURISM_LABEL.to_string(),
    }
}

pub fn external_link(name: &str) -> String {
    format!("{SEARCH_URL}{}", format!("{name} Berlin").replace(' ', "+"))
}
