pub mod match_repo;
pub mod models;
pub mod rating_repo;
