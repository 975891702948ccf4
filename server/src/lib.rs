//! Confera Pages - Event page service
//!
//! Manages per-event static pages (imprint, venue, code of conduct) with
//! localized content, stable slug URLs, manual display ordering, and
//! footer/frontpage navigation links.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod events;
pub mod pages;
pub mod permissions;
