use std::collections::{BinaryHeap, HashSet};

use serde::Serialize;

use crate::catalog::Catalog;
use crate::models::StreamingPackage;

use super::coverage::{score_combination, CoverageMode, CoverageScore};
use super::universe::MatchUniverse;

/// Which price field a search ranks by. A package lacking the target price
/// is ineligible for that search only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTarget {
    Monthly,
    Yearly,
}

impl PriceTarget {
    pub fn price_of(&self, package: &StreamingPackage) -> Option<u32> {
        match self {
            PriceTarget::Monthly => package.monthly_price_cents,
            PriceTarget::Yearly => package.monthly_price_yearly_subscription_in_cents,
        }
    }
}

/// Effort bounds for the exact search. `max_nodes` caps total candidate
/// visits across the whole call and stands in for a timeout; hitting it
/// without a complete solution hands the request to the greedy fallback.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    pub max_results: usize,
    pub max_combination_size: usize,
    pub max_nodes: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_results: 10,
            max_combination_size: 5,
            max_nodes: 200_000,
        }
    }
}

/// A duplicate-free package set with its derived costs and aggregate
/// coverage. A member lacking one of the price tiers contributes 0 to that
/// total and stays in the set.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Combination {
    pub package_ids: Vec<u32>,
    pub total_monthly_cost_cents: u32,
    pub total_yearly_cost_cents: u32,
    pub coverage: CoverageScore,
}

/// The engine's one response shape: the same search ranked by monthly price
/// and by yearly-equivalent monthly price.
#[derive(Debug, Clone, Serialize)]
pub struct CombinationLists {
    pub monthly_ordered: Vec<Combination>,
    pub yearly_ordered: Vec<Combination>,
}

impl CombinationLists {
    pub fn is_empty(&self) -> bool {
        self.monthly_ordered.is_empty() && self.yearly_ordered.is_empty()
    }
}

// Coverage bitmask over universe bit positions.
pub(super) type Mask = Vec<u64>;

pub(super) fn empty_mask(bits: usize) -> Mask {
    vec![0u64; bits.div_ceil(64)]
}

fn set_bit(mask: &mut Mask, pos: usize) {
    mask[pos / 64] |= 1u64 << (pos % 64);
}

pub(super) fn union(a: &Mask, b: &Mask) -> Mask {
    a.iter().zip(b).map(|(x, y)| x | y).collect()
}

/// True when every set bit of `a` is already set in `b`.
fn is_subset(a: &Mask, b: &Mask) -> bool {
    a.iter().zip(b).all(|(x, y)| x & !y == 0)
}

pub(super) fn count_ones(mask: &Mask) -> usize {
    mask.iter().map(|w| w.count_ones() as usize).sum()
}

pub(super) struct Candidate {
    pub id: u32,
    pub price: u32,
    pub live_mask: Mask,
    pub highlights_mask: Mask,
}

/// Candidates for a search: not excluded, priced for the target, and with
/// non-empty coverage over the universe. Sorted by price then id so the
/// enumeration order (and thus every tie-break) is deterministic.
pub(super) fn build_candidates(
    catalog: &Catalog,
    universe: &MatchUniverse,
    exclude: &HashSet<u32>,
    target: PriceTarget,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = catalog
        .packages()
        .iter()
        .filter(|p| !exclude.contains(&p.id))
        .filter_map(|p| {
            let price = target.price_of(p)?;
            let mut live_mask = empty_mask(universe.len());
            let mut highlights_mask = empty_mask(universe.len());
            for &game_id in universe.ids() {
                if let Some(flags) = catalog.offer(game_id, p.id) {
                    let pos = universe
                        .position(game_id)
                        .expect("universe id must have a position");
                    if flags.live {
                        set_bit(&mut live_mask, pos);
                    }
                    if flags.highlights {
                        set_bit(&mut highlights_mask, pos);
                    }
                }
            }
            // A package offering nothing in the universe can never improve
            // a combination.
            if count_ones(&live_mask) == 0 && count_ones(&highlights_mask) == 0 {
                return None;
            }
            Some(Candidate {
                id: p.id,
                price,
                live_mask,
                highlights_mask,
            })
        })
        .collect();

    candidates.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.id.cmp(&b.id)));
    candidates
}

struct CoveringSet {
    cost: u32,
    ids: Vec<u32>,
}

struct SubsetSearch<'a> {
    candidates: &'a [Candidate],
    total_bits: usize,
    limits: SearchLimits,
    nodes: u64,
    exhausted: bool,
    found: Vec<CoveringSet>,
    seen: HashSet<Vec<u32>>,
    // max-heap over the cheapest `max_results` covering costs; its top is
    // the branch-and-bound cost ceiling once full
    best_costs: BinaryHeap<u32>,
}

impl<'a> SubsetSearch<'a> {
    fn new(candidates: &'a [Candidate], total_bits: usize, limits: SearchLimits) -> Self {
        SubsetSearch {
            candidates,
            total_bits,
            limits,
            nodes: 0,
            exhausted: false,
            found: Vec::new(),
            seen: HashSet::new(),
            best_costs: BinaryHeap::new(),
        }
    }

    fn cost_ceiling(&self) -> Option<u32> {
        if self.best_costs.len() >= self.limits.max_results {
            self.best_costs.peek().copied()
        } else {
            None
        }
    }

    fn record(&mut self, cost: u32, chosen: &[usize]) {
        let mut ids: Vec<u32> = chosen.iter().map(|&i| self.candidates[i].id).collect();
        ids.sort_unstable();
        if !self.seen.insert(ids.clone()) {
            return;
        }
        self.best_costs.push(cost);
        if self.best_costs.len() > self.limits.max_results {
            self.best_costs.pop();
        }
        self.found.push(CoveringSet { cost, ids });
    }

    /// Depth-limited DFS over candidates in price order. Covering subsets
    /// are recorded and never extended; partial subsets are cut off once
    /// their accrued cost exceeds the current ceiling.
    fn dfs(&mut self, start: usize, size_cap: usize, cost: u32, mask: &Mask, chosen: &mut Vec<usize>) {
        for i in start..self.candidates.len() {
            if self.exhausted {
                return;
            }
            self.nodes += 1;
            if self.nodes > self.limits.max_nodes {
                self.exhausted = true;
                return;
            }

            let candidate = &self.candidates[i];
            let new_cost = cost + candidate.price;
            // Candidates are price-sorted, so once one branch is over the
            // ceiling every later sibling is too.
            if let Some(ceiling) = self.cost_ceiling() {
                if new_cost > ceiling {
                    return;
                }
            }
            // Zero marginal coverage: any covering superset through this
            // candidate is dominated by the same set without it.
            if is_subset(&candidate.live_mask, mask) {
                continue;
            }

            let new_mask = union(mask, &candidate.live_mask);
            chosen.push(i);
            if count_ones(&new_mask) == self.total_bits {
                self.record(new_cost, chosen);
            } else if chosen.len() < size_cap {
                self.dfs(i + 1, size_cap, new_cost, &new_mask, chosen);
            }
            chosen.pop();
        }
    }
}

/// Exact search: minimum-cost package subsets whose union fully covers the
/// universe live. Subset enumeration runs smallest size first with
/// branch-and-bound cost pruning; results are ranked by cost, then subset
/// size, then lexicographic package ids, and dominated supersets are
/// dropped. Returns empty when full live coverage is infeasible or the
/// effort bound was hit without a complete solution.
pub fn search(
    catalog: &Catalog,
    universe: &MatchUniverse,
    exclude: &HashSet<u32>,
    target: PriceTarget,
    limits: SearchLimits,
    mode: CoverageMode,
) -> Vec<Combination> {
    if universe.is_empty() || limits.max_results == 0 {
        return Vec::new();
    }

    let candidates = build_candidates(catalog, universe, exclude, target);
    if candidates.is_empty() {
        return Vec::new();
    }

    // Infeasibility check: even the union of every candidate must cover.
    let mut all = empty_mask(universe.len());
    for candidate in &candidates {
        all = union(&all, &candidate.live_mask);
    }
    if count_ones(&all) != universe.len() {
        return Vec::new();
    }

    let mut state = SubsetSearch::new(&candidates, universe.len(), limits);
    let start_mask = empty_mask(universe.len());
    for size_cap in 1..=limits.max_combination_size {
        let mut chosen = Vec::new();
        state.dfs(0, size_cap, 0, &start_mask, &mut chosen);
        if state.exhausted {
            break;
        }
    }

    if state.found.is_empty() {
        // Either exhausted within budget or no subset up to the size cap
        // covers; both degrade to the fallback.
        return Vec::new();
    }

    let mut found = state.found;
    found.sort_by(|a, b| {
        a.cost
            .cmp(&b.cost)
            .then_with(|| a.ids.len().cmp(&b.ids.len()))
            .then_with(|| a.ids.cmp(&b.ids))
    });

    // Dominance: a covering subset beats every costlier-or-equal superset.
    let mut kept: Vec<CoveringSet> = Vec::new();
    for set in found {
        let dominated = kept
            .iter()
            .any(|k| k.ids.iter().all(|id| set.ids.contains(id)));
        if !dominated {
            kept.push(set);
        }
        if kept.len() == limits.max_results {
            break;
        }
    }

    kept.into_iter()
        .map(|set| build_combination(catalog, universe, set.ids, mode))
        .collect()
}

/// The two ranked lists the transport layer exposes: one search per price
/// target over the same universe.
pub fn find_combinations(
    catalog: &Catalog,
    universe: &MatchUniverse,
    exclude: &HashSet<u32>,
    limits: SearchLimits,
    mode: CoverageMode,
) -> CombinationLists {
    CombinationLists {
        monthly_ordered: search(catalog, universe, exclude, PriceTarget::Monthly, limits, mode),
        yearly_ordered: search(catalog, universe, exclude, PriceTarget::Yearly, limits, mode),
    }
}

pub(super) fn build_combination(
    catalog: &Catalog,
    universe: &MatchUniverse,
    ids: Vec<u32>,
    mode: CoverageMode,
) -> Combination {
    let coverage = score_combination(catalog, universe, &ids, mode);
    let mut monthly = 0u32;
    let mut yearly = 0u32;
    for id in &ids {
        if let Some(package) = catalog.package(*id) {
            monthly += package.monthly_price_cents.unwrap_or(0);
            yearly += package
                .monthly_price_yearly_subscription_in_cents
                .unwrap_or(0);
        }
    }
    Combination {
        package_ids: ids,
        total_monthly_cost_cents: monthly,
        total_yearly_cost_cents: yearly,
        coverage,
    }
}
