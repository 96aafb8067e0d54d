//! Job listings, search and stats.

pub mod handlers;
