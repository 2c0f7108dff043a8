//! Offline-first news briefing: headline sync, snapshot cache, day-bucketed
//! reading history and storage statistics over a string key-value store.

pub mod app;
pub mod cache;
pub mod commands;
pub mod config;
pub mod dates;
pub mod db;
pub mod favorites;
pub mod locale;
pub mod news;
pub mod prefs;
pub mod sync;
