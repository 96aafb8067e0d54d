//! LaTeX résumé rendering and the per-user template store.

pub mod generator;
pub mod handlers;
pub mod template;

pub use generator::generate_latex;
