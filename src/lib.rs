// Library exports for the creator dashboard client.
// The binary and the integration tests drive the same screens.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod notifications;
pub mod render;
pub mod routes;
pub mod screens;
pub mod state;
