//! Fuzzy c-means clustering over fixed-dimension vectors, seeded by a
//! deterministic farthest-point heuristic.
//!
//! # Usage
//!
//! ```
//! use kfuzzy::{FuzzyCMeans, Options, Vector};
//!
//! let vectors = vec![
//!     Vector::from([0.0, 0.0]),
//!     Vector::from([0.0, 1.0]),
//!     Vector::from([9.0, 9.0]),
//!     Vector::from([9.0, 10.0]),
//! ];
//!
//! let engine = FuzzyCMeans::new();
//! let assignment = engine.clusterize(&vectors, 2, &Options::new(2.0, 100)).unwrap();
//! assert_eq!(assignment.len(), 4);
//! assert_eq!(assignment[0], assignment[1]);
//! assert_ne!(assignment[0], assignment[2]);
//! ```
//!
//! # Design
//!
//! [`FuzzyCMeans::clusterize`] runs exactly [`Options::max_iterations`]
//! refinement rounds. There is no convergence test and no randomness, so
//! identical input always yields an identical assignment.
//!
//! Initial centers come from a [`CenterSeeder`]. The default
//! [`CenterSeedAdapter`] picks mutually distant input vectors with
//! [`FarthestPointSeeder`]; either layer can be replaced.

mod centers;
mod error;
mod fcm;
mod numeric;
mod seeder;
mod vector;

pub use centers::{CenterSeedAdapter, CenterSeeder};
pub use error::{KFuzzyError, Result};
pub use fcm::{FuzzyCMeans, Options};
pub use numeric::{approx_eq, approx_zero, EPSILON};
pub use seeder::{FarthestPointSeeder, MostDistant};
pub use vector::{check_dimensions, Vector};
