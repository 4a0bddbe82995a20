use std::io;

use crate::models::{PlayerScore, PlayerSummary, SearchRecord};

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Writes the combined record table in the snapshot column layout, plus the
/// period label column.
pub fn write_records<W: io::Write>(writer: W, records: &[SearchRecord]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "actual_player",
        "name_variation",
        "country",
        "country_code",
        "search_type",
        "merch_category",
        "merch_term",
        "volume",
        "has_volume",
        "status",
        "period",
    ])?;
    for record in records {
        let volume = record.volume.to_string();
        out.write_record([
            record.player.as_str(),
            record.name_variation.as_str(),
            record.country.as_str(),
            record.country_code.as_str(),
            record.search_type.as_str(),
            record.merch_category.as_deref().unwrap_or(""),
            record.merch_term.as_deref().unwrap_or(""),
            volume.as_str(),
            flag(record.has_volume),
            record.status.as_str(),
            record.period.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_player_summary<W: io::Write>(
    writer: W,
    summaries: &[PlayerSummary],
) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "player",
        "status",
        "total_volume",
        "countries",
        "name_variations",
    ])?;
    for summary in summaries {
        let total_volume = summary.total_volume.to_string();
        let countries = summary.countries.to_string();
        let name_variations = summary.name_variations.to_string();
        out.write_record([
            summary.player.as_str(),
            summary.status.as_str(),
            total_volume.as_str(),
            countries.as_str(),
            name_variations.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_scores<W: io::Write>(writer: W, scores: &[PlayerScore]) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "player",
        "matched_player",
        "match_stage",
        "search_volume",
        "search",
        "social",
        "current_team",
        "previous_teams",
        "nationality",
        "trophies",
        "sport",
        "position",
        "age",
        "total",
    ])?;
    for score in scores {
        let breakdown = &score.breakdown;
        let stage = score
            .match_stage
            .map(|s| s.to_string())
            .unwrap_or_default();
        let search_volume = score
            .search_volume
            .map(|v| v.to_string())
            .unwrap_or_default();
        let fields = [
            format!("{:.2}", breakdown.search),
            format!("{:.2}", breakdown.social),
            format!("{:.2}", breakdown.current_team),
            format!("{:.2}", breakdown.previous_teams),
            format!("{:.2}", breakdown.nationality),
            format!("{:.2}", breakdown.trophies),
            format!("{:.2}", breakdown.sport),
            format!("{:.2}", breakdown.position),
            format!("{:.2}", breakdown.age),
            format!("{:.2}", breakdown.total),
        ];
        out.write_record(
            [
                score.name.as_str(),
                score.matched_player.as_deref().unwrap_or(""),
                stage.as_str(),
                search_volume.as_str(),
            ]
            .into_iter()
            .chain(fields.iter().map(|f| f.as_str())),
        )?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchStage, ScoreBreakdown, Status};

    fn sample_record() -> SearchRecord {
        SearchRecord {
            player: "Vinicius Junior".to_string(),
            name_variation: "Vini Jr".to_string(),
            country: "Brazil".to_string(),
            country_code: "BR".to_string(),
            search_type: "Name Only".to_string(),
            merch_category: None,
            merch_term: None,
            volume: 120000.0,
            has_volume: true,
            status: Status::Signed,
            period: "july".to_string(),
        }
    }

    #[test]
    fn records_csv_has_snapshot_layout() {
        let mut buffer = Vec::new();
        write_records(&mut buffer, &[sample_record()]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "actual_player,name_variation,country,country_code,search_type,merch_category,merch_term,volume,has_volume,status,period"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Vinicius Junior,Vini Jr,Brazil,BR,Name Only,,,120000,1,signed,july"
        );
    }

    #[test]
    fn summary_csv_lists_player_rollups() {
        let summary = PlayerSummary {
            player: "Vinicius Junior".to_string(),
            status: Status::Signed,
            total_volume: 2_500_000.0,
            countries: 12,
            name_variations: 3,
        };
        let mut buffer = Vec::new();
        write_player_summary(&mut buffer, &[summary]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("player,status,total_volume,countries,name_variations"));
        assert!(text.contains("Vinicius Junior,signed,2500000,12,3"));
    }

    #[test]
    fn scores_csv_carries_the_breakdown() {
        let score = PlayerScore {
            name: "Vinicius Junior".to_string(),
            matched_player: Some("Vinicius Junior".to_string()),
            match_stage: Some(MatchStage::Exact),
            search_volume: Some(5_000_000.0),
            breakdown: ScoreBreakdown {
                search: 5.0,
                social: 6.0,
                current_team: 10.0,
                previous_teams: 0.0,
                nationality: 10.0,
                trophies: 5.0,
                sport: 10.0,
                position: 10.0,
                age: 10.0,
                total: 6.4,
            },
        };
        let mut buffer = Vec::new();
        write_scores(&mut buffer, &[score]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Vinicius Junior,Vinicius Junior,exact,5000000,"));
        assert!(text.contains("6.40"));
    }
}
