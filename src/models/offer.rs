use serde::{Deserialize, Serialize};

// One row of the offer relation: what a package shows for a single game.
// Absence of a row means the package does not carry the game at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamingOffer {
    pub game_id: u32,

    pub streaming_package_id: u32,

    pub live: bool,

    pub highlights: bool,
}

/// The two offer flags without the relation keys, as stored in the
/// catalog's (game, package) index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OfferFlags {
    pub live: bool,
    pub highlights: bool,
}
