pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod diary;
pub mod error;
pub mod events;
pub mod http;
#[cfg(test)]
pub mod memory;
pub mod reminders;
pub mod scoped;
pub mod state;
