use std::collections::HashSet;

use crate::catalog::Catalog;

use super::coverage::CoverageMode;
use super::search::{
    build_candidates, build_combination, count_ones, empty_mask, union, Candidate, Combination,
    CombinationLists, Mask, PriceTarget,
};
use super::universe::MatchUniverse;

/// Greedy set-cover approximation, used only after the exact search came
/// back empty. Repeatedly picks the candidate with the best marginal
/// coverage gain per cent over the still-uncovered part of the universe and
/// stops at full live coverage or a coverage plateau.
///
/// Always yields a combination when any candidate survives pruning, trading
/// cost optimality for availability; the coverage gap is reported as data,
/// not as an error.
pub fn search_backup(
    catalog: &Catalog,
    universe: &MatchUniverse,
    exclude: &HashSet<u32>,
    target: PriceTarget,
    highlights_weight: f64,
    mode: CoverageMode,
) -> Vec<Combination> {
    if universe.is_empty() {
        return Vec::new();
    }
    let candidates = build_candidates(catalog, universe, exclude, target);
    if candidates.is_empty() {
        return Vec::new();
    }

    let total = universe.len();
    let mut covered_live = empty_mask(total);
    let mut covered_highlights = empty_mask(total);
    let mut members: Vec<u32> = Vec::new();
    let mut picked = vec![false; candidates.len()];

    while count_ones(&covered_live) < total {
        let mut best: Option<(usize, f64, f64)> = None; // (index, ratio, gain)

        for (i, candidate) in candidates.iter().enumerate() {
            if picked[i] {
                continue;
            }
            let gain = marginal_gain(
                candidate,
                &covered_live,
                &covered_highlights,
                highlights_weight,
            );
            if gain <= 0.0 {
                continue;
            }
            let ratio = gain / f64::from(candidate.price.max(1));
            // Candidates are price-then-id sorted, so strict comparisons
            // keep the pick deterministic: better ratio, then larger gain.
            let better = match best {
                None => true,
                Some((_, best_ratio, best_gain)) => {
                    ratio.total_cmp(&best_ratio).is_gt()
                        || (ratio.total_cmp(&best_ratio).is_eq()
                            && gain.total_cmp(&best_gain).is_gt())
                }
            };
            if better {
                best = Some((i, ratio, gain));
            }
        }

        // Coverage plateau: nothing adds anything anymore.
        let Some((index, _, _)) = best else {
            break;
        };
        picked[index] = true;
        members.push(candidates[index].id);
        covered_live = union(&covered_live, &candidates[index].live_mask);
        covered_highlights = union(&covered_highlights, &candidates[index].highlights_mask);
    }

    if members.is_empty() {
        return Vec::new();
    }
    members.sort_unstable();
    vec![build_combination(catalog, universe, members, mode)]
}

/// Soft marginal credit of adding a candidate: a freshly live-covered game
/// counts 1, upgrading a highlights-only game to live counts 1 - w, a fresh
/// highlights-only game counts w.
fn marginal_gain(
    candidate: &Candidate,
    covered_live: &Mask,
    covered_highlights: &Mask,
    weight: f64,
) -> f64 {
    let mut fresh_live = 0usize;
    let mut upgraded = 0usize;
    let mut fresh_highlights = 0usize;

    for (word, (live, highlights)) in covered_live
        .iter()
        .copied()
        .zip(covered_highlights.iter().copied())
        .enumerate()
    {
        let c_live = candidate.live_mask[word];
        let c_highlights = candidate.highlights_mask[word];

        fresh_live += (c_live & !live & !highlights).count_ones() as usize;
        upgraded += (c_live & !live & highlights).count_ones() as usize;
        fresh_highlights += (c_highlights & !c_live & !live & !highlights).count_ones() as usize;
    }

    fresh_live as f64 + (1.0 - weight) * upgraded as f64 + weight * fresh_highlights as f64
}

/// Backup counterpart of the primary two-list operation.
pub fn find_combinations_backup(
    catalog: &Catalog,
    universe: &MatchUniverse,
    exclude: &HashSet<u32>,
    highlights_weight: f64,
    mode: CoverageMode,
) -> CombinationLists {
    CombinationLists {
        monthly_ordered: search_backup(
            catalog,
            universe,
            exclude,
            PriceTarget::Monthly,
            highlights_weight,
            mode,
        ),
        yearly_ordered: search_backup(
            catalog,
            universe,
            exclude,
            PriceTarget::Yearly,
            highlights_weight,
            mode,
        ),
    }
}
