// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Generation of grasp transition graphs for manipulation planning.
//!
//! Given a set of grippers and a set of objects carrying handles, this
//! crate enumerates every admissible partial gripper-to-handle assignment
//! and builds a finite-state transition graph over them: one node per
//! assignment, one loop edge per node, and one bidirectional composite
//! transition per single-grasp step between admissible assignments.
//!
//! # Architecture
//!
//! Dependency order, leaves first:
//!
//! - [`constraints`]: opaque constraint-set algebra (union, subtraction,
//!   emptiness); the core combines constraints, it never solves them.
//! - [`problem`]: gripper/handle/object index tables and the naming
//!   scheme for states and transitions.
//! - [`rules`]: declarative patterns compiled once into a cheap
//!   admissibility predicate over assignments.
//! - [`backend`]: the two collaborator traits, graph storage
//!   ([`GraphBackend`]) and the external constraint-building planning
//!   engine ([`ConstraintEngine`]).
//! - [`store`]: memoized (validate, parameterize, approach) constraint
//!   triples per grasp and per placement, with strict/relaxed placement
//!   policies.
//! - [`factory`]: the combinatorial enumerator and, in
//!   [`factory::transition`], the waypoint transition synthesizer that
//!   decomposes each grasp change into up to three intermediate states.
//!
//! # Usage
//!
//! ```no_run
//! # use grasp_graph::{GraphFactory, Problem, Rule};
//! # fn run<G: grasp_graph::GraphBackend, E: grasp_graph::ConstraintEngine>(
//! #     graph: G, engine: E) -> Result<(), grasp_graph::Error> {
//! let mut problem = Problem::new();
//! problem.set_grippers(["robot/gripper"]);
//! problem.add_object("box", vec!["box/handle"], vec!["box/bottom"]);
//! problem.set_env_contacts(["table"]);
//!
//! let mut factory = GraphFactory::new(problem, graph, engine);
//! factory.set_rules(&[Rule::new(&[".*"], &[".*"], true)])?;
//! factory.generate()?;
//! let (graph, _engine) = factory.into_parts();
//! # Ok(()) }
//! ```
//!
//! Generation is single-threaded, synchronous and one-shot: one bounded
//! recursion over the assignment tree, all-or-nothing on error.

pub mod backend;
pub mod constraints;
pub mod errors;
pub mod factory;
pub mod problem;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use backend::{ConstraintEngine, EdgeId, GraphBackend, NodeId};
pub use constraints::Constraints;
pub use errors::Error;
pub use factory::{GraphFactory, State};
pub use problem::{Grasps, Problem};
pub use rules::{Rule, RuleSet};
pub use store::{ConstraintStore, ConstraintTriple, PlacementPolicy};
