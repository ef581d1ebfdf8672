pub mod game;
pub mod offer;
pub mod package;

pub use game::Game;
pub use offer::{OfferFlags, StreamingOffer};
pub use package::StreamingPackage;
