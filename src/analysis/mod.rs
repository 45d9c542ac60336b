pub mod champion_stats;
pub mod filter;
pub mod ranking;
pub mod stats;
