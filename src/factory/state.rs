// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! A generated graph state and its derived constraint sets.

use crate::backend::NodeId;
use crate::constraints::Constraints;
use crate::problem::Grasps;

/// One state of the generated graph: a distinct admissible assignment.
///
/// Created at most once per assignment and never mutated afterwards. The
/// manifold holds while parked in the state; the foliation holds while
/// moving within it without changing grasps.
#[derive(Debug, Clone)]
pub struct State {
    /// The assignment this state represents.
    pub grasps: Grasps,
    /// Node created for it in the graph backend.
    pub node: NodeId,
    /// Human-readable name, also the node name.
    pub name: String,
    /// Depth at which the enumerator first reached this assignment
    /// (two per grasp added, so it counts grasp depth, not recursion order).
    pub priority: usize,
    /// Grasp constraints of held handles plus placement constraints of
    /// un-held objects.
    pub manifold: Constraints,
    /// The parameterizing complements of the manifold's constraints.
    pub foliation: Constraints,
}
