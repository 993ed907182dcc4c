//! League server: rating & match-outcome prediction engine behind a small
//! actix-web API.

pub mod cache;
pub mod config;
pub mod db;
pub mod engine;
pub mod http;
pub mod metrics;
pub mod recompute;
