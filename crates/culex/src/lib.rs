//! Culex: an agent-based mosquito population simulator.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Culex sub-crates. For most users, adding `culex` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use culex::prelude::*;
//!
//! // A 100x100 grid with one feeding site and one breeding site.
//! let mut feed = Grid::filled(100, 100, 0).unwrap();
//! feed.as_mut_slice()[20 * 100 + 30] = 1;
//! let mut breed = Grid::filled(100, 100, 0).unwrap();
//! breed.as_mut_slice()[70 * 100 + 60] = 1;
//! let env = Environment::new(
//!     SiteField::from_sites(feed).unwrap(),
//!     SiteField::from_sites(breed).unwrap(),
//! )
//! .unwrap();
//!
//! let mut engine = PopulationEngine::new(EngineConfig::default(), &env).unwrap();
//! let result = engine.step(&env).unwrap();
//! assert_eq!(result.snapshot.tick_id(), culex::types::TickId(1));
//! assert_eq!(engine.trail().len(), 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `culex-core` | Grids, site fields, the environment, ids, errors |
//! | [`engine`] | `culex-engine` | The population engine, its config, snapshots, and trail |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grids, site fields, and shared types (`culex-core`).
///
/// Build an [`types::Environment`] from two [`types::SiteField`]s, either
/// from precomputed gradients or from an occupancy grid alone.
pub use culex_core as types;

/// The population engine (`culex-engine`).
///
/// [`engine::PopulationEngine`] owns the agents and advances them one step
/// at a time; [`engine::TrailBuffer`] records their history.
pub use culex_engine as engine;

/// Common imports for typical Culex usage.
///
/// ```rust
/// use culex::prelude::*;
/// ```
pub mod prelude {
    // Environment
    pub use culex_core::{Environment, Grid, SiteField, SiteKind};

    // Errors
    pub use culex_core::{FieldError, StepError};
    pub use culex_engine::ConfigError;

    // Engine
    pub use culex_engine::{
        AgentSeed, Bounds, EngineConfig, LifecycleState, PopulationEngine, PopulationSnapshot,
        StepMetrics, StepReport, StepResult, TrailBuffer, TrailPoint,
    };
}
