//! # route-optimizer
//!
//! Route optimization core for a delivery operations backend: great-circle
//! distance math, a nearest-neighbor tour heuristic with distance/time/fuel
//! savings accounting, AI-assisted suggestions with a static fallback, and an
//! append-only optimization history.
//!
//! This is a library consumed by a thin transport layer (HTTP or otherwise);
//! it owns no wire format and no persistence — routes, stops, and history
//! records are reached through the traits in [`store`], and the suggestion
//! service through [`advice::AdviceGenerator`], so embedders and tests can
//! supply their own.
//!
//! ## Modules
//!
//! - [`geo`] — Haversine distance and path-length helpers
//! - [`models`] — Domain value types (Stop, Route, OptimizationResult, OptimizationRecord)
//! - [`store`] — Collaborator traits plus in-memory implementations
//! - [`advice`] — Suggestion generator trait, OpenAI client, fallback list
//! - [`optimizer`] — The nearest-neighbor route optimizer and its history query

pub mod advice;
pub mod geo;
pub mod models;
pub mod optimizer;
pub mod store;

pub use optimizer::{OptimizeError, OptimizerConfig, RouteOptimizer};
