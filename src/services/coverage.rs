use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::models::StreamingPackage;

use super::universe::MatchUniverse;

/// How highlights-only games count towards the coverage percentage.
///
/// Hard mode counts live games only; soft mode credits a highlights-only
/// game at the configured weight, which must lie strictly between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoverageMode {
    Hard,
    Soft { highlights_weight: f64 },
}

impl CoverageMode {
    pub fn soft(highlights_weight: f64) -> Self {
        CoverageMode::Soft { highlights_weight }
    }
}

/// Coverage statistics of one package (or package combination) over a match
/// universe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageScore {
    pub total_matches: usize,
    pub live_matches: usize,
    pub highlights_only_matches: usize,
    pub coverage_percentage: f64,
}

impl CoverageScore {
    fn compute(total: usize, live: usize, highlights_only: usize, mode: CoverageMode) -> Self {
        // Empty universe scores 0 by convention, never a division error.
        let percentage = if total == 0 {
            0.0
        } else {
            let credited = match mode {
                CoverageMode::Hard => live as f64,
                CoverageMode::Soft { highlights_weight } => {
                    live as f64 + highlights_weight * highlights_only as f64
                }
            };
            (credited / total as f64 * 100.0).clamp(0.0, 100.0)
        };
        CoverageScore {
            total_matches: total,
            live_matches: live,
            highlights_only_matches: highlights_only,
            coverage_percentage: percentage,
        }
    }

    pub fn is_full_live(&self) -> bool {
        self.total_matches > 0 && self.live_matches == self.total_matches
    }
}

/// One package together with its score, as returned by the compare
/// operation.
#[derive(Debug, Clone, Serialize)]
pub struct PackageCoverage {
    pub package: StreamingPackage,
    pub coverage: CoverageScore,
}

/// Score a single package over the universe.
///
/// Per game: no offer -> uncovered; live flag -> live; highlights without
/// live -> highlights-only; an offer with neither flag -> uncovered. Pure
/// and order-insensitive.
pub fn score_package(
    catalog: &Catalog,
    universe: &MatchUniverse,
    package_id: u32,
    mode: CoverageMode,
) -> CoverageScore {
    let mut live = 0usize;
    let mut highlights_only = 0usize;
    for &game_id in universe.ids() {
        match catalog.offer(game_id, package_id) {
            Some(flags) if flags.live => live += 1,
            Some(flags) if flags.highlights => highlights_only += 1,
            _ => {}
        }
    }
    CoverageScore::compute(universe.len(), live, highlights_only, mode)
}

/// Score every package in the catalog over the universe, in parallel, and
/// rank the result: best coverage first, then cheapest (yearly-equivalent
/// monthly price, missing prices last), then lowest id.
pub fn score_catalog(
    catalog: &Catalog,
    universe: &MatchUniverse,
    mode: CoverageMode,
) -> Vec<PackageCoverage> {
    let mut scored: Vec<PackageCoverage> = catalog
        .packages()
        .par_iter()
        .map(|package| PackageCoverage {
            package: package.clone(),
            coverage: score_package(catalog, universe, package.id, mode),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.coverage
            .coverage_percentage
            .total_cmp(&a.coverage.coverage_percentage)
            .then_with(|| {
                let pa = a.package.effective_monthly_price_cents().unwrap_or(u32::MAX);
                let pb = b.package.effective_monthly_price_cents().unwrap_or(u32::MAX);
                pa.cmp(&pb)
            })
            .then_with(|| a.package.id.cmp(&b.package.id))
    });
    scored
}

/// Aggregate score of a package set: a game is live-covered when any member
/// offers it live, highlights-only when no member offers it live but some
/// member offers highlights.
pub fn score_combination(
    catalog: &Catalog,
    universe: &MatchUniverse,
    package_ids: &[u32],
    mode: CoverageMode,
) -> CoverageScore {
    let mut live = 0usize;
    let mut highlights_only = 0usize;
    for &game_id in universe.ids() {
        let mut any_live = false;
        let mut any_highlights = false;
        for &package_id in package_ids {
            if let Some(flags) = catalog.offer(game_id, package_id) {
                any_live |= flags.live;
                any_highlights |= flags.highlights;
            }
        }
        if any_live {
            live += 1;
        } else if any_highlights {
            highlights_only += 1;
        }
    }
    CoverageScore::compute(universe.len(), live, highlights_only, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Game, StreamingOffer, StreamingPackage};
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

    fn package(id: u32, monthly: Option<u32>, yearly: Option<u32>) -> StreamingPackage {
        StreamingPackage {
            id,
            name: format!("P{id}"),
            monthly_price_cents: monthly,
            monthly_price_yearly_subscription_in_cents: yearly,
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

    fn universe_for(catalog: &Catalog, team: &str) -> MatchUniverse {
        MatchUniverse::resolve(catalog, &[team.to_string()])
    }

    #[test]
    fn classifies_live_highlights_and_uncovered() {
        let catalog = Catalog::from_parts(
            vec![
                game(1, "A", "B"),
                game(2, "A", "C"),
                game(3, "A", "D"),
                game(4, "A", "E"),
            ],
            vec![package(1, Some(500), None)],
            vec![
                offer(1, 1, true, true),
                offer(2, 1, false, true),
                // an offer with neither flag counts as uncovered
                offer(3, 1, false, false),
            ],
        );
        let universe = universe_for(&catalog, "A");

        let score = score_package(&catalog, &universe, 1, CoverageMode::Hard);
        assert_eq!(score.total_matches, 4);
        assert_eq!(score.live_matches, 1);
        assert_eq!(score.highlights_only_matches, 1);
        assert_eq!(score.coverage_percentage, 25.0);
    }

    #[test]
    fn soft_mode_credits_highlights_at_weight() {
        let catalog = Catalog::from_parts(
            vec![game(1, "A", "B"), game(2, "A", "C")],
            vec![package(1, Some(500), None)],
            vec![offer(1, 1, true, false), offer(2, 1, false, true)],
        );
        let universe = universe_for(&catalog, "A");

        let hard = score_package(&catalog, &universe, 1, CoverageMode::Hard);
        assert_eq!(hard.coverage_percentage, 50.0);

        let soft = score_package(&catalog, &universe, 1, CoverageMode::soft(0.5));
        assert_eq!(soft.coverage_percentage, 75.0);
    }

    #[test]
    fn empty_universe_scores_zero() {
        let catalog = Catalog::from_parts(
            vec![game(1, "A", "B")],
            vec![package(1, Some(500), None)],
            vec![],
        );
        let universe = universe_for(&catalog, "Nobody");

        let score = score_package(&catalog, &universe, 1, CoverageMode::Hard);
        assert_eq!(score.total_matches, 0);
        assert_eq!(score.coverage_percentage, 0.0);
    }

    #[test]
    fn catalog_ranking_orders_by_coverage_then_price_then_id() {
        let catalog = Catalog::from_parts(
            vec![game(1, "A", "B"), game(2, "A", "C")],
            vec![
                package(1, Some(900), Some(800)),
                package(2, Some(500), Some(400)),
                package(3, None, None),
            ],
            vec![
                offer(1, 1, true, false),
                offer(2, 1, true, false),
                offer(1, 2, true, false),
                offer(2, 2, true, false),
                offer(1, 3, true, false),
            ],
        );
        let universe = universe_for(&catalog, "A");

        let ranked = score_catalog(&catalog, &universe, CoverageMode::Hard);
        let order: Vec<u32> = ranked.iter().map(|p| p.package.id).collect();
        // 1 and 2 both fully cover; 2 is cheaper. 3 is half coverage.
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn combination_union_and_monotonicity() {
        let catalog = Catalog::from_parts(
            vec![game(1, "A", "B"), game(2, "A", "C")],
            vec![package(1, Some(500), None), package(2, Some(700), None)],
            vec![offer(1, 1, true, false), offer(2, 2, true, false)],
        );
        let universe = universe_for(&catalog, "A");

        let single = score_combination(&catalog, &universe, &[1], CoverageMode::Hard);
        let both = score_combination(&catalog, &universe, &[1, 2], CoverageMode::Hard);

        assert_eq!(single.coverage_percentage, 50.0);
        assert_eq!(both.coverage_percentage, 100.0);
        assert!(both.coverage_percentage >= single.coverage_percentage);
        assert!(both.is_full_live());
    }

    #[test]
    fn combination_live_wins_over_highlights() {
        let catalog = Catalog::from_parts(
            vec![game(1, "A", "B")],
            vec![package(1, Some(500), None), package(2, Some(700), None)],
            vec![offer(1, 1, false, true), offer(1, 2, true, false)],
        );
        let universe = universe_for(&catalog, "A");

        let score = score_combination(&catalog, &universe, &[1, 2], CoverageMode::Hard);
        assert_eq!(score.live_matches, 1);
        assert_eq!(score.highlights_only_matches, 0);
    }
}
