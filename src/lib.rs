pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod render;
pub mod session;
pub mod token;
pub mod watchlist;
