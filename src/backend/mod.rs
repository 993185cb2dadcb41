// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Collaborator traits.
//!
//! The generator drives two external systems it never inspects:
//!
//! - a [`GraphBackend`] receiving node/edge creation calls: the graph
//!   representation handed to the motion planner;
//! - a [`ConstraintEngine`] building the geometric constraints and
//!   answering joint introspection queries.
//!
//! Both are held by value by the factory; any implementer of the trait is
//! valid, and the factory performs no downcasting. Failures reported by
//! either collaborator abort the whole generation.

use crate::constraints::Constraints;
use crate::errors::Error;

/// Identifier of a graph node, assigned by the backend.
pub type NodeId = usize;

/// Identifier of a graph edge, assigned by the backend.
pub type EdgeId = usize;

/// Graph storage receiving the generated states and transitions.
pub trait GraphBackend {
    /// Create a node. `waypoint` marks internal waypoint states that the
    /// planner must not treat as externally-visible graph states.
    fn create_node(&mut self, name: &str, waypoint: bool, priority: usize)
        -> Result<NodeId, Error>;

    /// Create a plain directional edge.
    fn create_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        name: &str,
        weight: i64,
    ) -> Result<EdgeId, Error>;

    /// Create a composite edge backed by `n_waypoints` intermediate states.
    ///
    /// The composite edge reserves `n_waypoints + 1` hop slots; the last
    /// slot carries the final hop into the destination node.
    fn create_waypoint_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        name: &str,
        n_waypoints: usize,
    ) -> Result<EdgeId, Error>;

    /// Fill one hop slot of a composite edge with its hop edge and the node
    /// that hop arrives at.
    fn set_waypoint(
        &mut self,
        composite: EdgeId,
        index: usize,
        hop: EdgeId,
        target: NodeId,
    ) -> Result<(), Error>;

    /// Declare which state an edge belongs to (whose foliation it moves in).
    fn set_containing_node(&mut self, edge: EdgeId, node: NodeId) -> Result<(), Error>;

    /// Mark an edge as eligible for planner-side path shortcutting.
    fn set_short(&mut self, edge: EdgeId, short: bool) -> Result<(), Error>;

    /// Attach constraints to a node (its manifold).
    fn add_node_constraints(&mut self, node: NodeId, constraints: &Constraints)
        -> Result<(), Error>;

    /// Attach constraints to an edge (the foliation it moves in).
    fn add_edge_constraints(&mut self, edge: EdgeId, constraints: &Constraints)
        -> Result<(), Error>;
}

/// External planning engine building geometric constraints.
///
/// Constraints are registered under the name passed in; the generator later
/// refers to them by name only (see [`Constraints`]).
pub trait ConstraintEngine {
    /// Build the constraint validating that `gripper` grasps `handle`.
    /// Its complement must be registered as `"<name>/complement"`.
    fn create_grasp(&mut self, name: &str, gripper: &str, handle: &str) -> Result<(), Error>;

    /// Build the approach (pre-grasp) constraint of a grasp.
    fn create_pregrasp(&mut self, name: &str, gripper: &str, handle: &str) -> Result<(), Error>;

    /// Build the constraint validating an object placement from its contact
    /// surfaces against the environment contact surfaces.
    /// Its complement must be registered as `"<name>/complement"`.
    fn create_placement(
        &mut self,
        name: &str,
        contacts: &[String],
        env_contacts: &[String],
    ) -> Result<(), Error>;

    /// Build the pre-placement constraint hovering `width` above placement.
    fn create_pre_placement(
        &mut self,
        name: &str,
        contacts: &[String],
        env_contacts: &[String],
        width: f64,
    ) -> Result<(), Error>;

    /// Lock a joint at the given configuration.
    fn create_locked_joint(&mut self, name: &str, joint: &str, config: &[f64])
        -> Result<(), Error>;

    /// Parametric dimension of a registered constraint. Zero-dimensional
    /// constraints are trivial and dropped from the built triples.
    fn constraint_dimension(&self, name: &str) -> Result<usize, Error>;

    /// Names of the joints belonging to an object's kinematic sub-tree.
    fn joints_of_object(&self, object: &str) -> Result<Vec<String>, Error>;

    /// Current configuration of a joint.
    fn joint_config(&self, joint: &str) -> Result<Vec<f64>, Error>;
}
