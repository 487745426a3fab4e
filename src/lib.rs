//! Genetic TSP Solver Library
//!
//! A genetic algorithm solver for the Traveling Salesman Problem over
//! integer cost matrices.
//!
//! # Features
//!
//! - Cost-matrix instance loading with shape validation
//! - Fixed-size population with ranking and worst-suffix replenishment
//! - Tiered replicated-list parent selection
//! - Order crossover and swap mutation preserving tour validity
//! - Fully seeded, reproducible evolution loop
//!
//! # Example
//!
//! ```no_run
//! use tsp_ga_solver::instance::TspInstance;
//! use tsp_ga_solver::genetic::{Evolution, GaConfig};
//!
//! // Load instance
//! let instance = TspInstance::from_file("instance.txt").unwrap();
//!
//! // Configure and run the genetic algorithm
//! let config = GaConfig {
//!     population_size: 50,
//!     num_generations: 200,
//!     ..Default::default()
//! };
//! let mut evolution = Evolution::new(instance, config).unwrap();
//! let solution = evolution.run().unwrap();
//!
//! println!("Best cost: {}", solution.cost);
//! ```

pub mod genetic;
pub mod instance;
pub mod population;
pub mod tour;

pub use instance::TspInstance;
pub use population::Population;
pub use tour::Tour;
