use std::collections::BTreeMap;

use crate::models::{SearchRecord, Status};

/// Full identity of a record for cross-period grouping. A record with no
/// merchandise fields groups under `None`, never drops out of the output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    player: String,
    name_variation: String,
    country: String,
    country_code: String,
    search_type: String,
    status: Status,
    merch_category: Option<String>,
    merch_term: Option<String>,
}

impl GroupKey {
    fn of(record: &SearchRecord) -> Self {
        GroupKey {
            player: record.player.clone(),
            name_variation: record.name_variation.clone(),
            country: record.country.clone(),
            country_code: record.country_code.clone(),
            search_type: record.search_type.clone(),
            status: record.status,
            merch_category: record.merch_category.clone(),
            merch_term: record.merch_term.clone(),
        }
    }
}

/// Combines the requested periods into a single record set.
///
/// One requested period passes its records through unchanged. Several
/// requested periods are concatenated and grouped by the full identity key,
/// summing volume and OR-ing the has-volume flag; the output rows carry a
/// display-only label naming the periods that contributed. Requested periods
/// missing from `by_period` are skipped, and no available data yields an
/// empty result rather than an error.
pub fn combine_periods(
    by_period: &BTreeMap<String, Vec<SearchRecord>>,
    requested: &[String],
) -> Vec<SearchRecord> {
    if requested.len() == 1 {
        return by_period
            .get(&requested[0])
            .cloned()
            .unwrap_or_default();
    }

    let present: Vec<&String> = requested
        .iter()
        .filter(|period| by_period.contains_key(*period))
        .collect();
    let label = present
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut groups: BTreeMap<GroupKey, (f64, bool)> = BTreeMap::new();
    for period in &present {
        for record in &by_period[*period] {
            let entry = groups.entry(GroupKey::of(record)).or_insert((0.0, false));
            entry.0 += record.volume;
            entry.1 |= record.has_volume;
        }
    }

    groups
        .into_iter()
        .map(|(key, (volume, has_volume))| SearchRecord {
            player: key.player,
            name_variation: key.name_variation,
            country: key.country,
            country_code: key.country_code,
            search_type: key.search_type,
            merch_category: key.merch_category,
            merch_term: key.merch_term,
            volume,
            has_volume,
            status: key.status,
            period: label.clone(),
        })
        .collect()
}
