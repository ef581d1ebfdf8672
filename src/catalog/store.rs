use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::{Game, OfferFlags, StreamingPackage, StreamingOffer};

/// The immutable in-memory catalog the engine reads from: games, packages,
/// the offer relation, and the lookup indices the request path needs.
///
/// Built once by the importer and swapped wholesale on admin reload, so a
/// request always sees a consistent snapshot.
#[derive(Debug, Default)]
pub struct Catalog {
    games: HashMap<u32, Game>,
    packages: Vec<StreamingPackage>,
    offers: HashMap<(u32, u32), OfferFlags>,

    // team name -> game ids, answers "which games involve team T" without a scan
    games_by_team: HashMap<String, Vec<u32>>,
    team_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogStats {
    pub games: usize,
    pub packages: usize,
    pub offers: usize,
    pub teams: usize,
}

impl Catalog {
    pub fn from_parts(
        games: Vec<Game>,
        mut packages: Vec<StreamingPackage>,
        offers: Vec<StreamingOffer>,
    ) -> Self {
        let mut game_map: HashMap<u32, Game> = HashMap::with_capacity(games.len());
        let mut games_by_team: HashMap<String, Vec<u32>> = HashMap::new();
        let mut names: BTreeSet<String> = BTreeSet::new();

        for game in games {
            for team in [&game.team_home, &game.team_away] {
                games_by_team
                    .entry(team.clone())
                    .or_default()
                    .push(game.id);
                names.insert(team.clone());
            }
            game_map.insert(game.id, game);
        }
        for ids in games_by_team.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }

        packages.sort_unstable_by_key(|p| p.id);
        packages.dedup_by_key(|p| p.id);

        let mut offer_map: HashMap<(u32, u32), OfferFlags> =
            HashMap::with_capacity(offers.len());
        for offer in offers {
            let flags = OfferFlags {
                live: offer.live,
                highlights: offer.highlights,
            };
            // Duplicate rows for the same (game, package) pair merge by OR,
            // matching "any offer row grants the flag".
            let entry = offer_map
                .entry((offer.game_id, offer.streaming_package_id))
                .or_default();
            entry.live |= flags.live;
            entry.highlights |= flags.highlights;
        }

        Catalog {
            games: game_map,
            packages,
            offers: offer_map,
            games_by_team,
            team_names: names.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty() && self.packages.is_empty()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            games: self.games.len(),
            packages: self.packages.len(),
            offers: self.offers.len(),
            teams: self.team_names.len(),
        }
    }

    /// All team names (home and away combined), sorted, unique.
    pub fn team_names(&self) -> &[String] {
        &self.team_names
    }

    /// Case-insensitive substring search over team names.
    pub fn search_teams(&self, query: &str) -> Vec<String> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.team_names
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn game(&self, id: u32) -> Option<&Game> {
        self.games.get(&id)
    }

    /// Game ids for a team, exact name match. Unknown team -> empty.
    pub fn games_for_team(&self, team: &str) -> &[u32] {
        self.games_by_team
            .get(team)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn packages(&self) -> &[StreamingPackage] {
        &self.packages
    }

    pub fn package(&self, id: u32) -> Option<&StreamingPackage> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn offer(&self, game_id: u32, package_id: u32) -> Option<OfferFlags> {
        self.offers.get(&(game_id, package_id)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;

    fn game(id: u32, home: &str, away: &str) -> Game {
        Game {
            id,
            team_home: home.to_string(),
            team_away: away.to_string(),
            starts_at: Utc.with_ymd_and_hms(2024, 6, 14, 19, 0, 0).unwrap(),
            tournament_name: "Test League".to_string(),
        }
    }

    fn package(id: u32, name: &str) -> StreamingPackage {
        StreamingPackage {
            id,
            name: name.to_string(),
            monthly_price_cents: Some(999),
            monthly_price_yearly_subscription_in_cents: Some(899),
        }
    }

    fn offer(game_id: u32, package_id: u32, live: bool, highlights: bool) -> StreamingOffer {
        StreamingOffer {
            game_id,
            streaming_package_id: package_id,
            live,
            highlights,
        }
    }

    #[test]
    fn team_index_covers_home_and_away() {
        let catalog = Catalog::from_parts(
            vec![game(1, "Bayern", "Dortmund"), game(2, "Dortmund", "Leipzig")],
            vec![package(1, "A")],
            vec![],
        );

        assert_eq!(catalog.games_for_team("Bayern"), &[1]);
        assert_eq!(catalog.games_for_team("Dortmund"), &[1, 2]);
        assert_eq!(catalog.games_for_team("Nobody"), &[] as &[u32]);
        assert_eq!(
            catalog.team_names(),
            &["Bayern".to_string(), "Dortmund".to_string(), "Leipzig".to_string()]
        );
    }

    #[test]
    fn team_search_is_case_insensitive_substring() {
        let catalog = Catalog::from_parts(
            vec![game(1, "Bayern München", "Borussia Dortmund")],
            vec![],
            vec![],
        );

        assert_eq!(catalog.search_teams("dort"), vec!["Borussia Dortmund"]);
        assert_eq!(catalog.search_teams("BAYERN"), vec!["Bayern München"]);
        assert!(catalog.search_teams("").is_empty());
    }

    #[test]
    fn duplicate_offer_rows_merge_by_or() {
        let catalog = Catalog::from_parts(
            vec![game(1, "A", "B")],
            vec![package(7, "P")],
            vec![offer(1, 7, true, false), offer(1, 7, false, true)],
        );

        let flags = catalog.offer(1, 7).unwrap();
        assert!(flags.live);
        assert!(flags.highlights);
        assert_eq!(catalog.stats().offers, 1);
    }

    #[test]
    fn missing_offer_is_none() {
        let catalog = Catalog::from_parts(
            vec![game(1, "A", "B")],
            vec![package(7, "P")],
            vec![],
        );
        assert!(catalog.offer(1, 7).is_none());
    }
}
