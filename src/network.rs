pub mod graph;
pub mod tiers;
