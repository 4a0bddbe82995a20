use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use crate::error::SourceError;
use crate::models::{MatchStage, PlayerProfile};

#[derive(Debug, Deserialize)]
struct ReferenceDocument {
    players: Vec<PlayerProfile>,
}

/// Read-only registry over the player reference document, loaded once per
/// session. Lookup is a two-stage resolver: exact lower-cased name match,
/// then case-insensitive substring containment in either direction. The
/// substring stage is heuristic and can mismatch contained names ("Johnson"
/// vs "Johnson Jr"); callers get the stage back so fallback hits are visible.
pub struct ProfileBook {
    players: Vec<PlayerProfile>,
    by_name: HashMap<String, usize>,
}

impl ProfileBook {
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let document: ReferenceDocument = serde_json::from_str(json)?;
        let mut by_name = HashMap::new();
        for (index, profile) in document.players.iter().enumerate() {
            by_name.insert(profile.name.trim().to_lowercase(), index);
        }
        info!("loaded {} player profiles", document.players.len());
        Ok(ProfileBook {
            players: document.players,
            by_name,
        })
    }

    pub fn resolve(&self, query: &str) -> Option<(&PlayerProfile, MatchStage)> {
        let needle = query.trim().to_lowercase();
        if let Some(&index) = self.by_name.get(&needle) {
            return Some((&self.players[index], MatchStage::Exact));
        }
        for profile in &self.players {
            let name = profile.name.to_lowercase();
            if name.contains(&needle) || needle.contains(&name) {
                return Some((profile, MatchStage::Substring));
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerProfile> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "players": [
            {
                "name": "Ronaldinho",
                "team": "Retired",
                "position": "AM",
                "age": 45,
                "nationality": "Brazil",
                "league": "N/A",
                "previous_teams": ["Barcelona", "AC Milan", "Paris Saint-Germain"],
                "major_trophies": ["World Cup", "Ballon d'Or", "Champions League"],
                "instagram_followers": "75M",
                "sport": "Football"
            },
            {
                "name": "Jude Bellingham",
                "team": "Real Madrid",
                "position": "CM",
                "age": 22,
                "nationality": "England",
                "league": "La Liga",
                "previous_teams": ["Borussia Dortmund", "Birmingham City"],
                "major_trophies": ["La Liga"],
                "instagram_followers": "35M",
                "sport": "Football"
            }
        ]
    }"#;

    #[test]
    fn parses_the_players_document() {
        let book = ProfileBook::from_json_str(SAMPLE).unwrap();
        assert_eq!(book.len(), 2);
        let (profile, _) = book.resolve("Ronaldinho").unwrap();
        assert_eq!(profile.previous_teams.len(), 3);
        assert_eq!(profile.instagram_followers.as_deref(), Some("75M"));
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let book = ProfileBook::from_json_str(SAMPLE).unwrap();
        let (profile, stage) = book.resolve("jude bellingham").unwrap();
        assert_eq!(profile.name, "Jude Bellingham");
        assert_eq!(stage, MatchStage::Exact);
    }

    #[test]
    fn substring_fallback_matches_either_direction() {
        let book = ProfileBook::from_json_str(SAMPLE).unwrap();

        // query contained in a profile name
        let (profile, stage) = book.resolve("Bellingham").unwrap();
        assert_eq!(profile.name, "Jude Bellingham");
        assert_eq!(stage, MatchStage::Substring);

        // profile name contained in the query
        let (profile, stage) = book.resolve("Ronaldinho Gaucho").unwrap();
        assert_eq!(profile.name, "Ronaldinho");
        assert_eq!(stage, MatchStage::Substring);
    }

    #[test]
    fn unknown_names_miss() {
        let book = ProfileBook::from_json_str(SAMPLE).unwrap();
        assert!(book.resolve("Zlatan").is_none());
    }

    #[test]
    fn missing_name_field_is_a_parse_error() {
        let json = r#"{"players": [{"team": "Real Madrid"}]}"#;
        assert!(ProfileBook::from_json_str(json).is_err());
    }

    #[test]
    fn sparse_entries_parse_with_defaults() {
        let json = r#"{"players": [{"name": "Mystery Player"}]}"#;
        let book = ProfileBook::from_json_str(json).unwrap();
        let (profile, _) = book.resolve("Mystery Player").unwrap();
        assert_eq!(profile.team, "");
        assert!(profile.age.is_none());
        assert!(profile.previous_teams.is_empty());
    }
}
