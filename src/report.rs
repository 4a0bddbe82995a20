use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{
    CountrySummary, MerchSummary, PlayerScore, PlayerSummary, SearchRecord, Status, StatusSummary,
};

pub fn summarize_players(records: &[SearchRecord]) -> Vec<PlayerSummary> {
    struct Rollup {
        status: Status,
        total_volume: f64,
        countries: HashSet<String>,
        name_variations: HashSet<String>,
    }

    let mut map: BTreeMap<String, Rollup> = BTreeMap::new();
    for record in records {
        let entry = map.entry(record.player.clone()).or_insert_with(|| Rollup {
            status: record.status,
            total_volume: 0.0,
            countries: HashSet::new(),
            name_variations: HashSet::new(),
        });
        entry.total_volume += record.volume;
        entry.countries.insert(record.country.clone());
        entry.name_variations.insert(record.name_variation.clone());
    }

    let mut summaries: Vec<PlayerSummary> = map
        .into_iter()
        .map(|(player, rollup)| PlayerSummary {
            player,
            status: rollup.status,
            total_volume: rollup.total_volume,
            countries: rollup.countries.len(),
            name_variations: rollup.name_variations.len(),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_volume
            .partial_cmp(&a.total_volume)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

pub fn summarize_countries(records: &[SearchRecord]) -> Vec<CountrySummary> {
    let mut map: BTreeMap<String, (f64, HashSet<String>)> = BTreeMap::new();
    for record in records {
        let entry = map
            .entry(record.country.clone())
            .or_insert_with(|| (0.0, HashSet::new()));
        entry.0 += record.volume;
        entry.1.insert(record.player.clone());
    }

    let mut summaries: Vec<CountrySummary> = map
        .into_iter()
        .map(|(country, (total_volume, players))| {
            let players = players.len();
            let avg_per_player = if players == 0 {
                0.0
            } else {
                total_volume / players as f64
            };
            let players_per_million = if total_volume > 0.0 {
                players as f64 / (total_volume / 1_000_000.0)
            } else {
                0.0
            };
            CountrySummary {
                country,
                total_volume,
                players,
                avg_per_player,
                players_per_million,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.total_volume
            .partial_cmp(&a.total_volume)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

fn summarize_merch_by<F>(records: &[SearchRecord], field: F) -> Vec<MerchSummary>
where
    F: Fn(&SearchRecord) -> Option<&String>,
{
    let mut map: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        if record.search_type != "Merchandise" {
            continue;
        }
        if let Some(label) = field(record) {
            *map.entry(label.clone()).or_insert(0.0) += record.volume;
        }
    }

    let mut summaries: Vec<MerchSummary> = map
        .into_iter()
        .map(|(label, total_volume)| MerchSummary {
            label,
            total_volume,
        })
        .collect();
    summaries.sort_by(|a, b| {
        b.total_volume
            .partial_cmp(&a.total_volume)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

pub fn summarize_merch_categories(records: &[SearchRecord]) -> Vec<MerchSummary> {
    summarize_merch_by(records, |r| r.merch_category.as_ref())
}

pub fn summarize_merch_terms(records: &[SearchRecord]) -> Vec<MerchSummary> {
    summarize_merch_by(records, |r| r.merch_term.as_ref())
}

pub fn summarize_status(records: &[SearchRecord]) -> Vec<StatusSummary> {
    let mut map: BTreeMap<Status, (HashSet<String>, f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = map
            .entry(record.status)
            .or_insert_with(|| (HashSet::new(), 0.0, 0));
        entry.0.insert(record.player.clone());
        entry.1 += record.volume;
        entry.2 += 1;
    }

    map.into_iter()
        .map(|(status, (players, total_volume, rows))| StatusSummary {
            status,
            players: players.len(),
            total_volume,
            avg_volume_per_row: if rows == 0 {
                0.0
            } else {
                total_volume / rows as f64
            },
        })
        .collect()
}

pub fn build_report(
    periods_label: &str,
    generated_on: NaiveDate,
    records: &[SearchRecord],
    scores: Option<&[PlayerScore]>,
) -> String {
    let players = summarize_players(records);
    let countries = summarize_countries(records);
    let categories = summarize_merch_categories(records);
    let terms = summarize_merch_terms(records);
    let statuses = summarize_status(records);
    let total_volume: f64 = records.iter().map(|r| r.volume).sum();

    let mut output = String::new();
    let _ = writeln!(output, "# Player Demand Report");
    let _ = writeln!(output, "Generated for {periods_label} on {generated_on}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Dataset");

    if records.is_empty() {
        let _ = writeln!(output, "No data for the requested periods.");
    } else {
        let signed = players.iter().filter(|p| p.status == Status::Signed).count();
        let unsigned = players.len() - signed;
        let _ = writeln!(
            output,
            "{} rows covering {} players ({} signed, {} unsigned), total search volume {:.0}.",
            records.len(),
            players.len(),
            signed,
            unsigned,
            total_volume
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Players by Search Volume");

    if players.is_empty() {
        let _ = writeln!(output, "No player rows for the requested periods.");
    } else {
        for summary in players.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}) {:.0} searches across {} markets, {} name variations",
                summary.player,
                summary.status,
                summary.total_volume,
                summary.countries,
                summary.name_variations
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Market Mix");

    if countries.is_empty() {
        let _ = writeln!(output, "No market rows for the requested periods.");
    } else {
        for summary in countries.iter().take(10) {
            let _ = writeln!(
                output,
                "- {}: {:.0} searches, {} players (avg {:.0} per player, {:.2} players per million searches)",
                summary.country,
                summary.total_volume,
                summary.players,
                summary.avg_per_player,
                summary.players_per_million
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Merchandise");

    if categories.is_empty() {
        let _ = writeln!(output, "No merchandise searches for the requested periods.");
    } else {
        for summary in categories.iter().take(10) {
            let _ = writeln!(output, "- {}: {:.0} searches", summary.label, summary.total_volume);
        }
        let _ = writeln!(output);
        let _ = writeln!(output, "Top terms:");
        for summary in terms.iter().take(10) {
            let _ = writeln!(output, "- {}: {:.0} searches", summary.label, summary.total_volume);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");

    if statuses.is_empty() {
        let _ = writeln!(output, "No rows for the requested periods.");
    } else {
        for summary in &statuses {
            let _ = writeln!(
                output,
                "- {}: {} players, {:.0} searches (avg {:.0} per row)",
                summary.status, summary.players, summary.total_volume, summary.avg_volume_per_row
            );
        }
    }

    if let Some(scores) = scores {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Top Opportunities");

        if scores.is_empty() {
            let _ = writeln!(output, "No profiles to score.");
        } else {
            for score in scores.iter().take(10) {
                let stage = score
                    .match_stage
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "no search data".to_string());
                let _ = writeln!(
                    output,
                    "- {} score {:.2} (search {:.1}, social {:.1}, trophies {:.1}; volume match: {})",
                    score.name,
                    score.breakdown.total,
                    score.breakdown.search,
                    score.breakdown.social,
                    score.breakdown.trophies,
                    stage
                );
            }
        }
    }

    output
}
