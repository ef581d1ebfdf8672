use std::collections::{BTreeSet, HashMap};

use crate::catalog::Catalog;

/// The set of games relevant to a team selection: every game where one of
/// the selected teams plays home or away, deduplicated by id.
///
/// Ids are kept sorted and each id is assigned a stable bit position, which
/// is what the combination search uses for its coverage masks. Universes are
/// derived per request and never stored.
#[derive(Debug, Clone, Default)]
pub struct MatchUniverse {
    ids: Vec<u32>,
    positions: HashMap<u32, usize>,
}

impl MatchUniverse {
    /// Resolve the universe for a team selection. An empty selection or a
    /// selection of unknown teams yields an empty universe, not an error.
    pub fn resolve(catalog: &Catalog, teams: &[String]) -> Self {
        let mut ids: BTreeSet<u32> = BTreeSet::new();
        for team in teams {
            ids.extend(catalog.games_for_team(team));
        }
        Self::from_ids(ids.into_iter().collect())
    }

    fn from_ids(ids: Vec<u32>) -> Self {
        let positions = ids
            .iter()
            .enumerate()
            .map(|(pos, id)| (*id, pos))
            .collect();
        MatchUniverse { ids, positions }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Game ids in ascending order.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Bit position of a game id within this universe.
    pub fn position(&self, game_id: u32) -> Option<usize> {
        self.positions.get(&game_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Game, StreamingPackage};
    use chrono::{TimeZone, Utc};

    fn game(id: u32, home: &str, away: &str) -> Game {
        Game {
            id,
            team_home: home.to_string(),
            team_away: away.to_string(),
            starts_at: Utc.with_ymd_and_hms(2024, 6, 14, 19, 0, 0).unwrap(),
            tournament_name: "Test League".to_string(),
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_parts(
            vec![
                game(1, "Bayern", "Dortmund"),
                game(2, "Dortmund", "Leipzig"),
                game(3, "Leipzig", "Bayern"),
                game(4, "Freiburg", "Mainz"),
            ],
            vec![StreamingPackage {
                id: 1,
                name: "P".to_string(),
                monthly_price_cents: None,
                monthly_price_yearly_subscription_in_cents: None,
            }],
            vec![],
        )
    }

    #[test]
    fn universe_includes_home_and_away_games() {
        let universe = MatchUniverse::resolve(&catalog(), &["Bayern".to_string()]);
        assert_eq!(universe.ids(), &[1, 3]);
    }

    #[test]
    fn derby_between_two_selected_teams_appears_once() {
        let universe = MatchUniverse::resolve(
            &catalog(),
            &["Bayern".to_string(), "Dortmund".to_string()],
        );
        assert_eq!(universe.ids(), &[1, 2, 3]);
        assert_eq!(universe.len(), 3);
    }

    #[test]
    fn unknown_team_and_empty_selection_yield_empty_universe() {
        assert!(MatchUniverse::resolve(&catalog(), &["Nobody".to_string()]).is_empty());
        assert!(MatchUniverse::resolve(&catalog(), &[]).is_empty());
    }

    #[test]
    fn positions_are_stable_ascending() {
        let universe = MatchUniverse::resolve(
            &catalog(),
            &["Bayern".to_string(), "Dortmund".to_string()],
        );
        assert_eq!(universe.position(1), Some(0));
        assert_eq!(universe.position(2), Some(1));
        assert_eq!(universe.position(3), Some(2));
        assert_eq!(universe.position(4), None);
    }
}
