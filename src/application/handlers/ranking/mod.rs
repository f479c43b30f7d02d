//! Ranking command handlers.

mod rank_areas;

pub use rank_areas::{RankAreasCommand, RankAreasHandler};
