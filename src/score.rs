use std::collections::HashMap;

use crate::models::{AgeValue, MatchStage, PlayerProfile, PlayerScore, ScoreBreakdown};
use crate::profiles::ProfileBook;

pub const WEIGHT_SEARCH: f64 = 0.25;
pub const WEIGHT_SOCIAL: f64 = 0.15;
pub const WEIGHT_CURRENT_TEAM: f64 = 0.10;
pub const WEIGHT_PREVIOUS_TEAMS: f64 = 0.10;
pub const WEIGHT_NATIONALITY: f64 = 0.08;
pub const WEIGHT_TROPHIES: f64 = 0.15;
pub const WEIGHT_SPORT: f64 = 0.05;
pub const WEIGHT_POSITION: f64 = 0.05;
pub const WEIGHT_AGE: f64 = 0.07;

pub const WEIGHTS: [f64; 9] = [
    WEIGHT_SEARCH,
    WEIGHT_SOCIAL,
    WEIGHT_CURRENT_TEAM,
    WEIGHT_PREVIOUS_TEAMS,
    WEIGHT_NATIONALITY,
    WEIGHT_TROPHIES,
    WEIGHT_SPORT,
    WEIGHT_POSITION,
    WEIGHT_AGE,
];

// Fixed allow-lists. Club matching is containment, so a reserve side whose
// name contains a listed club ("Real Madrid Castilla") lands in that club's
// tier.
const ELITE_CLUBS: &[&str] = &[
    "real madrid",
    "barcelona",
    "manchester united",
    "manchester city",
    "liverpool",
    "bayern munich",
    "paris saint-germain",
    "juventus",
    "chelsea",
    "arsenal",
];

const TOP_CLUBS: &[&str] = &[
    "atletico madrid",
    "borussia dortmund",
    "tottenham hotspur",
    "ac milan",
    "inter milan",
    "napoli",
    "sevilla",
    "ajax",
    "benfica",
    "porto",
];

const TOP_NATIONS: &[&str] = &[
    "brazil",
    "argentina",
    "france",
    "england",
    "spain",
    "germany",
    "portugal",
    "italy",
    "netherlands",
];

const GOOD_NATIONS: &[&str] = &[
    "belgium",
    "croatia",
    "uruguay",
    "colombia",
    "mexico",
    "united states",
    "morocco",
    "senegal",
    "japan",
];

// First matching keyword wins per trophy entry.
const TROPHY_POINTS: &[(&str, f64)] = &[
    ("world cup", 10.0),
    ("champions league", 9.0),
    ("ballon d'or", 10.0),
    ("euro", 6.0),
    ("copa america", 6.0),
    ("africa cup", 6.0),
    ("premier league", 8.0),
    ("la liga", 8.0),
    ("serie a", 8.0),
    ("bundesliga", 8.0),
    ("ligue 1", 8.0),
];

pub fn search_subscore(volume: Option<f64>) -> f64 {
    match volume {
        Some(v) => (v / 1_000_000.0).min(10.0),
        None => 0.0,
    }
}

pub fn social_subscore(followers: Option<&str>) -> f64 {
    let magnitude = match followers.and_then(parse_magnitude) {
        Some(m) => m,
        None => return 0.0,
    };
    if magnitude > 300.0 {
        10.0
    } else if magnitude > 150.0 {
        8.0
    } else if magnitude > 50.0 {
        6.0
    } else if magnitude > 10.0 {
        4.0
    } else if magnitude > 1.0 {
        2.0
    } else {
        1.0
    }
}

fn parse_magnitude(raw: &str) -> Option<f64> {
    let numeric: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse::<f64>().ok()
}

pub fn current_team_subscore(team: &str) -> f64 {
    let team = team.to_lowercase();
    if ELITE_CLUBS.iter().any(|club| team.contains(club)) {
        10.0
    } else if TOP_CLUBS.iter().any(|club| team.contains(club)) {
        7.0
    } else if team.contains("retired") {
        3.0
    } else {
        5.0
    }
}

pub fn previous_teams_subscore(teams: &[String]) -> f64 {
    let mut points: f64 = 0.0;
    for team in teams {
        let team = team.to_lowercase();
        if ELITE_CLUBS.iter().any(|club| team.contains(club)) {
            points += 2.0;
        } else if TOP_CLUBS.iter().any(|club| team.contains(club)) {
            points += 1.0;
        }
    }
    points.min(10.0)
}

pub fn nationality_subscore(nationality: &str) -> f64 {
    let nationality = nationality.trim();
    if TOP_NATIONS.iter().any(|n| nationality.eq_ignore_ascii_case(n)) {
        10.0
    } else if GOOD_NATIONS.iter().any(|n| nationality.eq_ignore_ascii_case(n)) {
        8.0
    } else {
        5.0
    }
}

pub fn trophies_subscore(trophies: &[String]) -> f64 {
    let mut points = 0.0;
    for trophy in trophies {
        let trophy = trophy.to_lowercase();
        if let Some((_, value)) = TROPHY_POINTS.iter().find(|(kw, _)| trophy.contains(kw)) {
            points += value;
        }
    }
    (points / 2.0).min(10.0)
}

pub fn sport_subscore(sport: &str) -> f64 {
    match sport.trim().to_lowercase().as_str() {
        "football" => 10.0,
        "basketball" => 7.0,
        "tennis" => 5.0,
        "boxing" => 4.0,
        _ => 3.0,
    }
}

pub fn position_subscore(sport: &str, position: &str) -> f64 {
    if !sport.trim().eq_ignore_ascii_case("football") {
        return 5.0;
    }
    let position = position.trim();
    let is = |options: &[&str]| options.iter().any(|p| position.eq_ignore_ascii_case(p));
    if is(&["ST", "CF", "RW", "LW"]) {
        10.0
    } else if is(&["AM", "CAM"]) {
        8.0
    } else if is(&["CM"]) {
        6.0
    } else if is(&["CB", "RB", "LB"]) {
        4.0
    } else if is(&["GK"]) {
        3.0
    } else {
        5.0
    }
}

pub fn age_subscore(age: Option<&AgeValue>) -> f64 {
    let years = match age {
        None => return 0.0,
        Some(AgeValue::Years(y)) => *y,
        Some(AgeValue::Label(label)) => {
            if label.to_lowercase().contains("deceased") {
                return 4.0;
            }
            match label.trim().parse::<f64>() {
                Ok(y) => y,
                Err(_) => return 0.0,
            }
        }
    };
    if (24.0..=32.0).contains(&years) {
        10.0
    } else if (18.0..=23.0).contains(&years) {
        8.0
    } else if (33.0..=38.0).contains(&years) {
        6.0
    } else {
        3.0
    }
}

/// Computes the weighted opportunity score for one profile. Every factor has
/// an unknown/default branch, so a sparse profile still produces a valid
/// (low) score.
pub fn opportunity_score(profile: &PlayerProfile, volume: Option<f64>) -> ScoreBreakdown {
    let search = search_subscore(volume);
    let social = social_subscore(profile.instagram_followers.as_deref());
    let current_team = current_team_subscore(&profile.team);
    let previous_teams = previous_teams_subscore(&profile.previous_teams);
    let nationality = nationality_subscore(&profile.nationality);
    let trophies = trophies_subscore(&profile.major_trophies);
    let sport = sport_subscore(&profile.sport);
    let position = position_subscore(&profile.sport, &profile.position);
    let age = age_subscore(profile.age.as_ref());

    let total = search * WEIGHT_SEARCH
        + social * WEIGHT_SOCIAL
        + current_team * WEIGHT_CURRENT_TEAM
        + previous_teams * WEIGHT_PREVIOUS_TEAMS
        + nationality * WEIGHT_NATIONALITY
        + trophies * WEIGHT_TROPHIES
        + sport * WEIGHT_SPORT
        + position * WEIGHT_POSITION
        + age * WEIGHT_AGE;

    ScoreBreakdown {
        search,
        social,
        current_team,
        previous_teams,
        nationality,
        trophies,
        sport,
        position,
        age,
        total,
    }
}

/// Finds the search-volume entry belonging to a profile name: exact
/// case-insensitive match first, then substring containment in either
/// direction. Returns the matched key and the stage that produced it.
pub fn volume_for<'a>(
    name: &str,
    volumes: &'a HashMap<String, f64>,
) -> Option<(&'a str, f64, MatchStage)> {
    let needle = name.trim().to_lowercase();
    let mut keys: Vec<&String> = volumes.keys().collect();
    keys.sort();

    for key in &keys {
        if key.to_lowercase() == needle {
            return Some((key.as_str(), volumes[*key], MatchStage::Exact));
        }
    }
    for key in &keys {
        let key_lower = key.to_lowercase();
        if key_lower.contains(&needle) || needle.contains(&key_lower) {
            return Some((key.as_str(), volumes[*key], MatchStage::Substring));
        }
    }
    None
}

/// Scores every profile in the book against the per-player volume totals
/// and returns the list ranked by total score, best first.
pub fn rank_players(book: &ProfileBook, volumes: &HashMap<String, f64>) -> Vec<PlayerScore> {
    let mut scores: Vec<PlayerScore> = book
        .iter()
        .map(|profile| {
            let matched = volume_for(&profile.name, volumes);
            let breakdown =
                opportunity_score(profile, matched.as_ref().map(|(_, volume, _)| *volume));
            PlayerScore {
                name: profile.name.clone(),
                matched_player: matched.as_ref().map(|(key, _, _)| key.to_string()),
                match_stage: matched.as_ref().map(|(_, _, stage)| *stage),
                search_volume: matched.as_ref().map(|(_, volume, _)| *volume),
                breakdown,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.breakdown
            .total
            .partial_cmp(&a.breakdown.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scores
}
