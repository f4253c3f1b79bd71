#![forbid(unsafe_code)]
//! schedgraph-sim library.
//!
//! Seeded, platform-stable synthesis of graph documents for exercising the
//! analysis engines.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod generator;
pub mod rng;

pub use generator::{
    DEFAULT_SEED, DatasetGenerator, DatasetSpec, STANDARD_SUITE, Shape, standard_suite,
    write_suite,
};
pub use rng::DeterministicRng;
