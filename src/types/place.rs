use std::{collections::HashMap, collections::HashSet, fmt, str::FromStr};

use color_eyre::eyre::{self, eyre};
use serde::{Deserialize, Serialize};

use super::overpass::OverpassElement;

/// A point of interest as returned by the poi query service
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoiRecord {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl PoiRecord {
    pub fn name(&self) -> Option<&str> {
        self.tags
            .get("name")
            .map(|name| name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn cuisine(&self) -> Option<&str> {
        self.tags.get("cuisine").map(|cuisine| cuisine.as_str())
    }
}

impl From<OverpassElement> for PoiRecord {
    fn from(element: OverpassElement) -> Self {
        PoiRecord {
            lat: element.lat,
            lng: element.lon,
            tags: element.tags,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Hotel,
    Tourism,
}

impl Category {
    #[cfg(test)]
    pub const ALL: [Category; 3] = [Category::Restaurant, Category::Hotel, Category::Tourism];

    /// Overpass tag selector for this category
    pub fn overpass_tag(&self) -> &'static str {
        match self {
            Category::Restaurant => r#"["amenity"="restaurant"]"#,
            Category::Hotel => r#"["tourism"="hotel"]"#,
            Category::Tourism => r#"["tourism"~"attraction|museum|artwork|viewpoint"]"#,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Hotel => "hotel",
            Category::Tourism => "tourism",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cuisine classification for restaurants, declared in matching priority order
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CuisineBucket {
    Korean,
    Western,
    Asian,
    Cafe,
    Other,
}

impl CuisineBucket {
    /// Buckets in the order they are tested. Other has no keywords and is the fallback.
    pub const PRIORITY: [CuisineBucket; 5] = [
        CuisineBucket::Korean,
        CuisineBucket::Western,
        CuisineBucket::Asian,
        CuisineBucket::Cafe,
        CuisineBucket::Other,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            CuisineBucket::Korean => &["korean"],
            CuisineBucket::Western => &[
                "burger", "pizza", "italian", "french", "german", "american", "steak",
            ],
            CuisineBucket::Asian => &[
                "chinese",
                "vietnamese",
                "thai",
                "japanese",
                "sushi",
                "asian",
                "indian",
            ],
            CuisineBucket::Cafe => &["coffee", "cafe", "cake"],
            CuisineBucket::Other => &[],
        }
    }

    /// Name shown to the user and accepted by the cuisine filter
    pub fn display_name(&self) -> &'static str {
        match self {
            CuisineBucket::Korean => "한식",
            CuisineBucket::Western => "양식",
            CuisineBucket::Asian => "아시안",
            CuisineBucket::Cafe => "카페",
            CuisineBucket::Other => "일반/기타",
        }
    }

    pub fn marker_color(&self) -> &'static str {
        match self {
            CuisineBucket::Korean => "red",
            CuisineBucket::Cafe => "beige",
            _ => "green",
        }
    }
}

impl fmt::Display for CuisineBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CuisineBucket {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "식당" {
            return Ok(CuisineBucket::Other);
        }
        CuisineBucket::PRIORITY
            .into_iter()
            .find(|bucket| {
                bucket.display_name() == s || format!("{bucket:?}").eq_ignore_ascii_case(s)
            })
            .ok_or(eyre!("Unknown cuisine: {s}"))
    }
}

/// Which restaurant buckets to keep
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CuisineFilter {
    #[default]
    All,
    Only(HashSet<CuisineBucket>),
}

impl CuisineFilter {
    pub const ALL_SENTINELS: [&'static str; 2] = ["전체", "all"];

    /// Parse a list of bucket names. The "All" sentinel anywhere in the list, or an
    /// empty list, disables filtering.
    pub fn parse<'a, I>(names: I) -> eyre::Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut buckets = HashSet::new();
        for name in names.into_iter().map(str::trim).filter(|n| !n.is_empty()) {
            if Self::ALL_SENTINELS
                .iter()
                .any(|sentinel| sentinel.eq_ignore_ascii_case(name))
            {
                return Ok(CuisineFilter::All);
            }
            buckets.insert(name.parse::<CuisineBucket>()?);
        }
        if buckets.is_empty() {
            Ok(CuisineFilter::All)
        } else {
            Ok(CuisineFilter::Only(buckets))
        }
    }

    /// Whether a restaurant in `bucket` survives the filter.
    ///
    /// A set containing `Other` lets every restaurant through, whatever its bucket.
    pub fn admits(&self, bucket: CuisineBucket) -> bool {
        match self {
            CuisineFilter::All => true,
            CuisineFilter::Only(buckets) => {
                buckets.is_empty()
                    || buckets.contains(&CuisineBucket::Other)
                    || buckets.contains(&bucket)
            }
        }
    }
}

/// A classified place ready for display
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DisplayPlace {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub category: Category,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<CuisineBucket>,
    pub external_link: String,
}

impl DisplayPlace {
    pub fn marker_color(&self) -> &'static str {
        match (self.category, self.bucket) {
            (Category::Restaurant, Some(bucket)) => bucket.marker_color(),
            (Category::Restaurant, None) => CuisineBucket::Other.marker_color(),
            (Category::Hotel, _) => "blue",
            (Category::Tourism, _) => "purple",
        }
    }
}
