pub mod app_state;
pub mod config;
pub mod entities;
pub mod health;
pub mod middleware;
pub mod moderation;
pub mod repositories;
pub mod reviews;
pub mod routes;
