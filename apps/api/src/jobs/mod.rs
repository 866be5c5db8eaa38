// Job search feature: sources, normalization, the shared pipeline and its HTTP handler.
// All relevance decisions go through crate::relevance; no chat calls here.

pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod snapshots;
pub mod sources;
