use serde::Deserialize;

/// Signing status of a player, normalized to exactly two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Signed,
    Unsigned,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Signed => "signed",
            Status::Unsigned => "unsigned",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of search-demand data for a single period.
#[derive(Debug, Clone)]
pub struct SearchRecord {
    pub player: String,
    pub name_variation: String,
    pub country: String,
    pub country_code: String,
    pub search_type: String,
    pub merch_category: Option<String>,
    pub merch_term: Option<String>,
    pub volume: f64,
    pub has_volume: bool,
    pub status: Status,
    pub period: String,
}

/// Age as found in the reference document: a plain number for active
/// players, or a textual marker such as "Deceased".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgeValue {
    Years(f64),
    Label(String),
}

/// Enrichment attributes for one player, keyed by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub age: Option<AgeValue>,
    #[serde(default)]
    pub nationality: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub previous_teams: Vec<String>,
    #[serde(default)]
    pub major_trophies: Vec<String>,
    #[serde(default)]
    pub instagram_followers: Option<String>,
    #[serde(default)]
    pub sport: String,
}

/// Per-factor sub-scores and the weighted total, each in [0, 10].
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    pub search: f64,
    pub social: f64,
    pub current_team: f64,
    pub previous_teams: f64,
    pub nationality: f64,
    pub trophies: f64,
    pub sport: f64,
    pub position: f64,
    pub age: f64,
    pub total: f64,
}

/// Which stage of the name resolver produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Exact,
    Substring,
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStage::Exact => f.write_str("exact"),
            MatchStage::Substring => f.write_str("substring"),
        }
    }
}

/// A scored player, with the search-data row the volume came from (if any).
#[derive(Debug, Clone)]
pub struct PlayerScore {
    pub name: String,
    pub matched_player: Option<String>,
    pub match_stage: Option<MatchStage>,
    pub search_volume: Option<f64>,
    pub breakdown: ScoreBreakdown,
}

/// Per-player rollup across the combined records.
#[derive(Debug, Clone)]
pub struct PlayerSummary {
    pub player: String,
    pub status: Status,
    pub total_volume: f64,
    pub countries: usize,
    pub name_variations: usize,
}

/// Per-country rollup across the combined records.
#[derive(Debug, Clone)]
pub struct CountrySummary {
    pub country: String,
    pub total_volume: f64,
    pub players: usize,
    pub avg_per_player: f64,
    pub players_per_million: f64,
}

/// Merchandise rollup for one category or term.
#[derive(Debug, Clone)]
pub struct MerchSummary {
    pub label: String,
    pub total_volume: f64,
}

/// Signed/unsigned split across the combined records.
#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub status: Status,
    pub players: usize,
    pub total_volume: f64,
    pub avg_volume_per_row: f64,
}
