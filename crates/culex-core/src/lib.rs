//! Core types for the Culex population simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! numeric environment the population engine consumes: row-major grids,
//! per-site-type occupancy and gradient fields, the co-registered
//! [`Environment`], strongly-typed ids, and the error types shared by the
//! rest of the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod id;
pub mod site;

pub use error::{FieldError, StepError};
pub use grid::Grid;
pub use id::{TickId, TrailColumn};
pub use site::{Environment, SiteField, SiteKind};
