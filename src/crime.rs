use std::{collections::BTreeMap, io::Read, path::Path, sync::Arc};

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::cache::{cache_key, TtlCache};

pub const DISTRICT_COLUMN: &str = "District";
pub const YEAR_COLUMN: &str = "Year";
/// Cells read as missing rather than as text
const MISSING_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];
/// Numeric columns that are identifiers or coordinates rather than counts
const NOT_COUNTS: [&str; 8] = ["Year", "Code", "District", "Location", "lat", "lng", "Lat", "Lng"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DistrictTotal {
    pub district: String,
    pub total_crime: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CrimeTypeTotal {
    pub crime_type: String,
    pub total: f64,
}

#[derive(Debug)]
pub struct CrimeTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    district: usize,
}

impl CrimeTable {
    /// Rows longer than the header are skipped, shorter rows read as missing trailing cells
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let district = headers
            .iter()
            .position(|h| h == DISTRICT_COLUMN)
            .ok_or(eyre!("No {DISTRICT_COLUMN} column"))?;
        let rows = reader
            .records()
            .filter_map(|record| match record {
                Ok(record) if record.len() > headers.len() => {
                    warn!(
                        "skipping crime row with {} fields, expected {}",
                        record.len(),
                        headers.len()
                    );
                    None
                }
                Ok(record) => Some(record.iter().map(String::from).collect()),
                Err(err) => {
                    warn!("skipping crime row: {err}");
                    None
                }
            })
            .collect();
        Ok(CrimeTable {
            headers,
            rows,
            district,
        })
    }

    #[instrument]
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .wrap_err_with(|| format!("Reading {}", path.display()))?;
        let table = Self::from_reader(bytes.as_slice())?;
        info!("loaded {} crime rows", table.rows.len());
        Ok(table)
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Trimmed cell, or None when it is absent or a missing-value marker
    fn cell(row: &[String], column: usize) -> Option<&str> {
        row.get(column)
            .map(|v| v.trim())
            .filter(|v| !MISSING_VALUES.contains(v))
    }

    fn value(row: &[String], column: usize) -> Option<f64> {
        Self::cell(row, column)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// A column is numeric when every present cell parses as a number
    fn is_numeric(&self, column: usize) -> bool {
        self.rows.iter().all(|row| {
            Self::cell(row, column).map_or(true, |v| v.parse::<f64>().is_ok())
        })
    }

    /// Columns holding crime counts
    fn count_columns(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|&c| !NOT_COUNTS.contains(&self.headers[c].as_str()))
            .filter(|&c| self.is_numeric(c))
            .collect()
    }

    /// Rows of the most recent year, or every row when there is no usable year column
    fn latest_rows(&self) -> Vec<&[String]> {
        let year = self.column(YEAR_COLUMN).filter(|&c| self.is_numeric(c));
        let latest = year.and_then(|c| {
            self.rows
                .iter()
                .filter_map(|row| Self::value(row, c))
                .reduce(f64::max)
        });
        self.rows
            .iter()
            .filter(|row| match (year, latest) {
                (Some(c), Some(latest)) => Self::value(row, c) == Some(latest),
                _ => true,
            })
            .map(|row| row.as_slice())
            .collect()
    }

    fn row_total(row: &[String], columns: &[usize]) -> f64 {
        columns.iter().filter_map(|&c| Self::value(row, c)).sum()
    }

    fn district_of<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.district).map_or("", |d| d.trim())
    }

    /// Total crimes per district for the latest year, sorted by district name
    pub fn district_totals(&self) -> Vec<DistrictTotal> {
        let columns = self.count_columns();
        let mut totals = BTreeMap::<String, f64>::new();
        for row in self.latest_rows() {
            *totals.entry(self.district_of(row).to_string()).or_default() +=
                Self::row_total(row, &columns);
        }
        totals
            .into_iter()
            .map(|(district, total_crime)| DistrictTotal {
                district,
                total_crime,
            })
            .collect()
    }

    fn type_totals<'a, I>(&self, rows: I) -> Vec<CrimeTypeTotal>
    where
        I: IntoIterator<Item = &'a [String]> + Clone,
    {
        let mut totals: Vec<CrimeTypeTotal> = self
            .count_columns()
            .into_iter()
            .map(|c| CrimeTypeTotal {
                crime_type: self.headers[c].clone(),
                total: rows
                    .clone()
                    .into_iter()
                    .filter_map(|row| Self::value(row, c))
                    .sum(),
            })
            .collect();
        totals.sort_by(|a, b| b.total.total_cmp(&a.total));
        totals
    }

    /// Totals per crime type across all districts for the latest year, largest first
    pub fn crime_type_totals(&self) -> Vec<CrimeTypeTotal> {
        self.type_totals(self.latest_rows())
    }

    /// Totals per crime type for a single district, or None when it has no rows
    pub fn district_breakdown(&self, district: &str) -> Option<Vec<CrimeTypeTotal>> {
        let district = district.trim();
        let rows: Vec<&[String]> = self
            .latest_rows()
            .into_iter()
            .filter(|row| self.district_of(row).eq_ignore_ascii_case(district))
            .collect();
        if rows.is_empty() {
            None
        } else {
            Some(self.type_totals(rows))
        }
    }
}

/// Load the crime table through the cache. Failures are logged and yield None.
pub async fn cached_table(
    path: &Path,
    cache: &TtlCache<Arc<CrimeTable>>,
) -> Option<Arc<CrimeTable>> {
    let key = cache_key("load_crime_table", &[&path.display()]);
    cache
        .get_or_try_fetch(key, || async { CrimeTable::load(path).await.map(Arc::new) })
        .await
        .map_err(|err| warn!("crime data unavailable: {err:#}"))
        .ok()
}

#[cfg(test)]
mod tests {
    use std::{io::Write, time::Duration};

    use super::*;

    const CSV: &str = "\
Year,Code,District,Location,Robbery,Street_robbery,Injury,Local
2012,10000,Mitte,Tiergarten Süd,70,46,586,5
2012,20000,Pankow,Prenzlauer Berg,20,10,200,1
2013,10000,Mitte,Tiergarten Süd,60,40,500,7
2013,10100,Mitte ,Regierungsviertel,5,5,50,
2013,20000,Pankow,Prenzlauer Berg,30,15,250,3
2013,30000,Spandau,Haselhorst,1,2,3,4,5
";

    fn table() -> CrimeTable {
        CrimeTable::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn sums_latest_year_per_trimmed_district() {
        assert_eq!(
            table().district_totals(),
            vec![
                DistrictTotal {
                    district: "Mitte".to_string(),
                    total_crime: 667.0,
                },
                DistrictTotal {
                    district: "Pankow".to_string(),
                    total_crime: 298.0,
                },
            ]
        );
    }

    #[test]
    fn without_year_all_rows_count() {
        let csv = "District,Theft,Fraud\nMitte,10,2\nMitte,5,1\nSpandau,3,0\n";
        let totals = CrimeTable::from_reader(csv.as_bytes())
            .unwrap()
            .district_totals();
        assert_eq!(totals[0].total_crime, 18.0);
        assert_eq!(totals[1].district, "Spandau");
        assert_eq!(totals[1].total_crime, 3.0);
    }

    #[test]
    fn text_columns_are_not_summed() {
        let csv = "District,Note,Theft\nMitte,busy,4\nMitte,12,6\n";
        let table = CrimeTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.district_totals()[0].total_crime, 10.0);
        let types: Vec<_> = table
            .crime_type_totals()
            .into_iter()
            .map(|t| t.crime_type)
            .collect();
        assert_eq!(types, vec!["Theft"]);
    }

    #[test]
    fn short_rows_read_as_missing_cells() {
        let csv = "Year,District,Theft,Robbery\n2023,Mitte,10,5\n2023,Mitte,7\n";
        let table = CrimeTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.district_totals()[0].total_crime, 22.0);
        assert_eq!(table.crime_type_totals()[1].total, 5.0);
    }

    #[test]
    fn missing_value_markers_are_skipped() {
        let csv = "District,Theft,Robbery,Fraud\nMitte,10,NaN,N/A\nMitte,4,NA,2\nPankow,1,3,null\n";
        let table = CrimeTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(
            table.district_totals(),
            vec![
                DistrictTotal {
                    district: "Mitte".to_string(),
                    total_crime: 16.0,
                },
                DistrictTotal {
                    district: "Pankow".to_string(),
                    total_crime: 4.0,
                },
            ]
        );
        let types: Vec<_> = table
            .crime_type_totals()
            .into_iter()
            .map(|t| (t.crime_type, t.total))
            .collect();
        assert_eq!(
            types,
            vec![
                ("Theft".to_string(), 15.0),
                ("Robbery".to_string(), 3.0),
                ("Fraud".to_string(), 2.0),
            ]
        );
    }

    #[test]
    fn infinite_cells_are_not_counted() {
        let csv = "District,Theft\nMitte,inf\nMitte,3\n";
        let table = CrimeTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.district_totals()[0].total_crime, 3.0);
    }

    #[test]
    fn missing_district_column_is_an_error() {
        assert!(CrimeTable::from_reader("Year,Theft\n2013,4\n".as_bytes()).is_err());
    }

    #[test]
    fn crime_types_largest_first() {
        let totals = table().crime_type_totals();
        let names: Vec<_> = totals.iter().map(|t| t.crime_type.as_str()).collect();
        assert_eq!(names, vec!["Injury", "Robbery", "Street_robbery", "Local"]);
        assert_eq!(totals[0].total, 800.0);
    }

    #[test]
    fn breakdown_for_one_district() {
        let breakdown = table().district_breakdown("mitte").unwrap();
        assert_eq!(breakdown[0].crime_type, "Injury");
        assert_eq!(breakdown[0].total, 550.0);
        assert!(table().district_breakdown("Atlantis").is_none());
    }

    #[tokio::test]
    async fn loads_from_disk_through_cache() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let cache = TtlCache::new(Duration::from_secs(60));

        let first = cached_table(file.path(), &cache).await.unwrap();
        let second = cached_table(file.path(), &cache).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.district_totals().len(), 2);
    }

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn cached_lookup_can_cross_threads() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert_send(cached_table(Path::new("crimes.csv"), &cache));
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert!(cached_table(Path::new("/nonexistent/crimes.csv"), &cache)
            .await
            .is_none());
    }
}
