pub mod backup;
pub mod coverage;
pub mod search;
pub mod universe;

pub use backup::{find_combinations_backup, search_backup};
pub use coverage::{
    score_catalog, score_combination, score_package, CoverageMode, CoverageScore, PackageCoverage,
};
pub use search::{
    find_combinations, search, Combination, CombinationLists, PriceTarget, SearchLimits,
};
pub use universe::MatchUniverse;
