use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ImportStats};
use crate::models::StreamingPackage;
use crate::services::{Combination, CombinationLists, CoverageMode, CoverageScore, PackageCoverage};

#[derive(Debug, Deserialize)]
pub struct TeamsRequest {
    pub teams: Vec<String>,
}

/// Wire form of the coverage mode; the soft weight itself is server
/// configuration, not caller input.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoverageModeParam {
    #[default]
    Hard,
    Soft,
}

impl CoverageModeParam {
    pub fn to_mode(self, highlights_weight: f64) -> CoverageMode {
        match self {
            CoverageModeParam::Hard => CoverageMode::Hard,
            CoverageModeParam::Soft => CoverageMode::soft(highlights_weight),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub teams: Vec<String>,
    #[serde(default)]
    pub mode: CoverageModeParam,
}

#[derive(Debug, Deserialize)]
pub struct CombinationsRequest {
    pub teams: Vec<String>,
    /// Package ids the caller already knows cover everything alone; the
    /// search looks for alternatives without them.
    #[serde(default)]
    pub exclude: Vec<u32>,
    #[serde(default)]
    pub mode: CoverageModeParam,
}

#[derive(Debug, Deserialize)]
pub struct TeamSearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub total_games: usize,
    pub packages: Vec<PackageCoverage>,
}

#[derive(Debug, Serialize)]
pub struct CombinationResponse {
    pub packages: Vec<StreamingPackage>,
    pub total_monthly_cost_cents: u32,
    pub total_yearly_cost_cents: u32,
    pub coverage: CoverageScore,
}

impl CombinationResponse {
    fn from_combination(catalog: &Catalog, combination: Combination) -> Self {
        let packages = combination
            .package_ids
            .iter()
            .filter_map(|id| catalog.package(*id).cloned())
            .collect();
        CombinationResponse {
            packages,
            total_monthly_cost_cents: combination.total_monthly_cost_cents,
            total_yearly_cost_cents: combination.total_yearly_cost_cents,
            coverage: combination.coverage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CombinationListsResponse {
    pub monthly_ordered: Vec<CombinationResponse>,
    pub yearly_ordered: Vec<CombinationResponse>,
}

impl CombinationListsResponse {
    pub fn from_lists(catalog: &Catalog, lists: CombinationLists) -> Self {
        CombinationListsResponse {
            monthly_ordered: lists
                .monthly_ordered
                .into_iter()
                .map(|c| CombinationResponse::from_combination(catalog, c))
                .collect(),
            yearly_ordered: lists
                .yearly_ordered
                .into_iter()
                .map(|c| CombinationResponse::from_combination(catalog, c))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub status: &'static str,
    pub stats: ImportStats,
}
