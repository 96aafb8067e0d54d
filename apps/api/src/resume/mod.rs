//! Résumé file uploads and AI analysis snapshots.

pub mod handlers;
pub mod upload;
