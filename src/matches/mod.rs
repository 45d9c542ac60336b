pub mod fetcher;
pub mod ids;
pub mod set;
