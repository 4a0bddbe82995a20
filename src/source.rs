use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::SourceError;
use crate::models::SearchRecord;
use crate::normalize;
use crate::profiles::ProfileBook;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

const REQUIRED_COLUMNS: &[&str] = &[
    "actual_player",
    "name_variation",
    "country",
    "country_code",
    "search_type",
    "volume",
    "has_volume",
];

/// One CSV row as it arrives from disk. Numeric-looking cells stay raw here;
/// coercion happens in one place, in `normalize`.
#[derive(Debug, Deserialize)]
struct RawRow {
    actual_player: String,
    name_variation: String,
    country: String,
    country_code: String,
    search_type: String,
    #[serde(default)]
    volume: Option<String>,
    #[serde(default)]
    has_volume: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    merch_category: Option<String>,
    #[serde(default)]
    merch_term: Option<String>,
}

/// Parses one period's snapshot. Column names and cells are trimmed, the
/// required columns are checked up front, and every row comes out with
/// normalized status and coerced volume fields.
pub fn parse_records(csv_text: &str, period: &str) -> Result<Vec<SearchRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == *column) {
            return Err(SourceError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        let row = row?;
        records.push(SearchRecord {
            player: row.actual_player,
            name_variation: row.name_variation,
            country: row.country,
            country_code: row.country_code,
            search_type: row.search_type,
            merch_category: normalize::clean_optional(row.merch_category),
            merch_term: normalize::clean_optional(row.merch_term),
            volume: normalize::coerce_volume(row.volume.as_deref()),
            has_volume: normalize::coerce_flag(row.has_volume.as_deref()),
            status: normalize::normalize_status(row.status.as_deref()),
            period: period.to_string(),
        });
    }
    Ok(records)
}

struct CacheEntry {
    loaded_at: Instant,
    records: Vec<SearchRecord>,
}

/// Loads `<period>.csv` snapshots from a data directory, with a read-through
/// cache keyed by file path. A repeated load inside the TTL window returns
/// the previous parse instead of touching the file again.
pub struct PeriodLoader {
    data_dir: PathBuf,
    ttl: Duration,
    cache: HashMap<PathBuf, CacheEntry>,
}

impl PeriodLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_ttl(data_dir, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(data_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        PeriodLoader {
            data_dir: data_dir.into(),
            ttl,
            cache: HashMap::new(),
        }
    }

    fn period_path(&self, period: &str) -> PathBuf {
        self.data_dir.join(format!("{period}.csv"))
    }

    pub fn load_period(&mut self, period: &str) -> Result<Vec<SearchRecord>, SourceError> {
        let path = self.period_path(period);
        if let Some(entry) = self.cache.get(&path) {
            if entry.loaded_at.elapsed() < self.ttl {
                return Ok(entry.records.clone());
            }
        }

        let text = std::fs::read_to_string(&path)?;
        let records = parse_records(&text, period)?;
        info!("loaded {} rows for period {period}", records.len());
        self.cache.insert(
            path,
            CacheEntry {
                loaded_at: Instant::now(),
                records: records.clone(),
            },
        );
        Ok(records)
    }

    /// Loads every requested period that can be read. Unreadable or
    /// unparseable snapshots are logged and left out of the result; a table
    /// with the wrong shape still fails the whole load so the caller can
    /// tell the two apart.
    pub fn load_available(
        &mut self,
        periods: &[String],
    ) -> Result<BTreeMap<String, Vec<SearchRecord>>, SourceError> {
        let mut by_period = BTreeMap::new();
        for period in periods {
            match self.load_period(period) {
                Ok(records) => {
                    by_period.insert(period.clone(), records);
                }
                Err(SourceError::Unavailable(reason)) => {
                    warn!("no data for period {period}: {reason}");
                }
                Err(err @ SourceError::MissingColumn(_)) => return Err(err),
            }
        }
        Ok(by_period)
    }
}

pub fn load_profiles(path: &Path) -> Result<ProfileBook, SourceError> {
    let text = std::fs::read_to_string(path)?;
    ProfileBook::from_json_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    const SNAPSHOT: &str = "\
actual_player, name_variation ,country,country_code,search_type,volume,has_volume,status,merch_category,merch_term
Vinicius Junior,Vini Jr,Brazil,BR,Name Only,120000,1,signed,,
Vinicius Junior,Vini Jr,Brazil,BR,Merchandise,3000,1,signed,Jersey,vini jr jersey
Endrick,Endrick,Brazil,BR,Name Only,N/A,0,unsign,,
";

    fn temp_data_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "player-demand-tracker-test-{}-{tag}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parses_and_normalizes_a_snapshot() {
        let records = parse_records(SNAPSHOT, "july").unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].player, "Vinicius Junior");
        assert_eq!(records[0].volume, 120000.0);
        assert_eq!(records[0].status, Status::Signed);
        assert_eq!(records[0].merch_category, None);
        assert_eq!(records[0].period, "july");

        assert_eq!(records[1].merch_category.as_deref(), Some("Jersey"));

        // junk volume coerces to zero, "unsign" normalizes
        assert_eq!(records[2].volume, 0.0);
        assert!(!records[2].has_volume);
        assert_eq!(records[2].status, Status::Unsigned);
    }

    #[test]
    fn missing_required_column_names_the_column() {
        let csv = "actual_player,country,country_code,search_type,volume,has_volume\nA,Brazil,BR,Name Only,1,1\n";
        match parse_records(csv, "july") {
            Err(SourceError::MissingColumn(column)) => assert_eq!(column, "name_variation"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_status_column_defaults_to_unsigned() {
        let csv = "\
actual_player,name_variation,country,country_code,search_type,volume,has_volume
A,A,Brazil,BR,Name Only,10,1
";
        let records = parse_records(csv, "july").unwrap();
        assert_eq!(records[0].status, Status::Unsigned);
    }

    #[test]
    fn loader_skips_unavailable_periods() {
        let dir = temp_data_dir("skip");
        std::fs::write(dir.join("july.csv"), SNAPSHOT).unwrap();

        let mut loader = PeriodLoader::new(&dir);
        let by_period = loader
            .load_available(&["july".to_string(), "august".to_string()])
            .unwrap();
        assert_eq!(by_period.len(), 1);
        assert!(by_period.contains_key("july"));
    }

    #[test]
    fn loader_surfaces_schema_errors() {
        let dir = temp_data_dir("schema");
        std::fs::write(dir.join("july.csv"), "actual_player,volume\nA,1\n").unwrap();

        let mut loader = PeriodLoader::new(&dir);
        let result = loader.load_available(&["july".to_string()]);
        assert!(matches!(result, Err(SourceError::MissingColumn(_))));
    }

    #[test]
    fn repeated_loads_inside_the_ttl_hit_the_cache() {
        let dir = temp_data_dir("ttl");
        std::fs::write(dir.join("july.csv"), SNAPSHOT).unwrap();

        let mut loader = PeriodLoader::new(&dir);
        let first = loader.load_period("july").unwrap();

        // rewrite the file; a fresh cache entry must shadow it
        std::fs::write(
            dir.join("july.csv"),
            "actual_player,name_variation,country,country_code,search_type,volume,has_volume\nB,B,Spain,ES,Name Only,5,1\n",
        )
        .unwrap();
        let second = loader.load_period("july").unwrap();
        assert_eq!(second.len(), first.len());
        assert_eq!(second[0].player, "Vinicius Junior");

        let mut cold = PeriodLoader::with_ttl(&dir, Duration::ZERO);
        let reloaded = cold.load_period("july").unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].player, "B");
    }
}
