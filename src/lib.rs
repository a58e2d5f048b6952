pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod podcast;
pub mod project;
pub mod render;
pub mod upload;
pub mod util;
