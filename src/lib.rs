//! Riot match history retrieval and per-player game statistics.

pub mod analysis;
pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod identity;
pub mod matches;
pub mod pipeline;
pub mod pool;
pub mod reference;
pub mod region;
pub mod service;
