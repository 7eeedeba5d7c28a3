pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod models;
pub mod routes;
pub mod utils;
pub mod views;
pub mod workflow;
