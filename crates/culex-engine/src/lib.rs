//! Step-driven mosquito population engine.
//!
//! Provides [`PopulationEngine`], which advances a population of agents
//! over a co-registered feeding/breeding [`Environment`](culex_core::Environment):
//! random-walk locomotion, gradient seeking, the fed/refractory lifecycle
//! with density-gated breeding, offspring creation, and a per-step trail
//! history with absent-padding for agents born later.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod locomotion;
pub mod metrics;
pub mod population;
pub mod reproduction;
pub mod seeking;
pub mod snapshot;
pub mod trail;

pub use config::{Bounds, ConfigError, EngineConfig};
pub use engine::{PopulationEngine, StepReport, StepResult};
pub use lifecycle::{Arrivals, ArrivalRules, BreedingEvent, DensityGrid, LifecycleState};
pub use metrics::StepMetrics;
pub use population::{AgentSeed, Population};
pub use snapshot::PopulationSnapshot;
pub use trail::{TrailBuffer, TrailPoint};
