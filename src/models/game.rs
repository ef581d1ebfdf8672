use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// A single scheduled match between two teams. Rows come from games.csv and
// are immutable once the catalog is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: u32,

    pub team_home: String,

    pub team_away: String,

    pub starts_at: DateTime<Utc>,

    pub tournament_name: String,
}
