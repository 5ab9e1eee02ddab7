pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod notice;
pub mod retry;
pub mod services;
