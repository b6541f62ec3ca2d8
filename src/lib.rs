pub mod addon;
pub mod app;
pub mod config;
pub mod error;
pub mod ids;
pub mod images;
pub mod manifest;
pub mod models;
pub mod tmdb;
