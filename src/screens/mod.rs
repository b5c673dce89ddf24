pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod feed;
pub mod gate;
pub mod merge;
pub mod profile;
pub mod remote;
pub mod saved;
