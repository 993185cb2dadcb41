// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.
//!
//! [`MemoryGraph`] records every backend call so tests can inspect the
//! generated graph; [`FakeEngine`] stands in for the planning engine,
//! reporting a configurable parametric dimension per constraint name.

use grasp_graph::{Constraints, ConstraintEngine, EdgeId, Error, GraphBackend, NodeId};
use std::collections::HashMap;

/// A recorded graph node.
#[derive(Debug, Clone)]
pub struct NodeRec {
    pub name: String,
    pub waypoint: bool,
    pub priority: usize,
    pub constraints: Constraints,
}

/// A recorded graph edge. `waypoints` is non-empty only for composite
/// waypoint edges; slot `i` holds the hop edge and the node it arrives at.
#[derive(Debug, Clone)]
pub struct EdgeRec {
    pub name: String,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: i64,
    pub short: bool,
    pub containing: Option<NodeId>,
    pub constraints: Constraints,
    pub waypoints: Vec<Option<(EdgeId, NodeId)>>,
}

/// In-memory recording implementation of [`GraphBackend`].
#[derive(Debug, Default)]
pub struct MemoryGraph {
    pub nodes: Vec<NodeRec>,
    pub edges: Vec<EdgeRec>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_named(&self, name: &str) -> Option<(NodeId, &NodeRec)> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.name == name)
    }

    pub fn edge_named(&self, name: &str) -> Option<(EdgeId, &EdgeRec)> {
        self.edges
            .iter()
            .enumerate()
            .find(|(_, e)| e.name == name)
    }

    /// Names of the non-waypoint (externally visible) nodes.
    pub fn state_names(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| !n.waypoint)
            .map(|n| n.name.as_str())
            .collect()
    }

    /// All node names, sorted, for isomorphism comparisons.
    pub fn sorted_node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.iter().map(|n| n.name.clone()).collect();
        names.sort();
        names
    }

    /// All edge names, sorted, for isomorphism comparisons.
    pub fn sorted_edge_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.edges.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }
}

impl GraphBackend for MemoryGraph {
    fn create_node(
        &mut self,
        name: &str,
        waypoint: bool,
        priority: usize,
    ) -> Result<NodeId, Error> {
        self.nodes.push(NodeRec {
            name: name.to_string(),
            waypoint,
            priority,
            constraints: Constraints::new(),
        });
        Ok(self.nodes.len() - 1)
    }

    fn create_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        name: &str,
        weight: i64,
    ) -> Result<EdgeId, Error> {
        self.edges.push(EdgeRec {
            name: name.to_string(),
            from,
            to,
            weight,
            short: false,
            containing: None,
            constraints: Constraints::new(),
            waypoints: Vec::new(),
        });
        Ok(self.edges.len() - 1)
    }

    fn create_waypoint_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        name: &str,
        n_waypoints: usize,
    ) -> Result<EdgeId, Error> {
        let id = self.create_edge(from, to, name, 1)?;
        self.edges[id].waypoints = vec![None; n_waypoints + 1];
        Ok(id)
    }

    fn set_waypoint(
        &mut self,
        composite: EdgeId,
        index: usize,
        hop: EdgeId,
        target: NodeId,
    ) -> Result<(), Error> {
        self.edges[composite].waypoints[index] = Some((hop, target));
        Ok(())
    }

    fn set_containing_node(&mut self, edge: EdgeId, node: NodeId) -> Result<(), Error> {
        self.edges[edge].containing = Some(node);
        Ok(())
    }

    fn set_short(&mut self, edge: EdgeId, short: bool) -> Result<(), Error> {
        self.edges[edge].short = short;
        Ok(())
    }

    fn add_node_constraints(
        &mut self,
        node: NodeId,
        constraints: &Constraints,
    ) -> Result<(), Error> {
        let c = self.nodes[node].constraints.clone() + constraints;
        self.nodes[node].constraints = c;
        Ok(())
    }

    fn add_edge_constraints(
        &mut self,
        edge: EdgeId,
        constraints: &Constraints,
    ) -> Result<(), Error> {
        let c = self.edges[edge].constraints.clone() + constraints;
        self.edges[edge].constraints = c;
        Ok(())
    }
}

/// Stub planning engine. Every registered constraint has
/// `default_dimension` unless overridden by name in `dimensions`.
#[derive(Debug)]
pub struct FakeEngine {
    pub default_dimension: usize,
    pub dimensions: HashMap<String, usize>,
    /// object name -> joints of its kinematic sub-tree
    pub joints: HashMap<String, Vec<String>>,
    /// every constraint name registered, in order
    pub created: Vec<String>,
    /// registering a constraint with this name fails, to exercise error
    /// propagation
    pub fail_on: Option<String>,
}

impl FakeEngine {
    /// Engine where every constraint is non-trivial.
    pub fn new() -> Self {
        Self {
            default_dimension: 1,
            dimensions: HashMap::new(),
            joints: HashMap::new(),
            created: Vec::new(),
            fail_on: None,
        }
    }

    /// Engine where every constraint is trivial (dimension zero).
    pub fn trivial() -> Self {
        Self {
            default_dimension: 0,
            ..Self::new()
        }
    }

    pub fn with_joints(mut self, object: &str, joints: &[&str]) -> Self {
        self.joints.insert(
            object.to_string(),
            joints.iter().map(|j| j.to_string()).collect(),
        );
        self
    }

    pub fn with_dimension(mut self, name: &str, dimension: usize) -> Self {
        self.dimensions.insert(name.to_string(), dimension);
        self
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    fn register(&mut self, name: &str) -> Result<(), Error> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(Error::Engine {
                operation: format!("create {}", name),
                message: "injected failure".to_string(),
            });
        }
        self.created.push(name.to_string());
        Ok(())
    }
}

impl ConstraintEngine for FakeEngine {
    fn create_grasp(&mut self, name: &str, _gripper: &str, _handle: &str) -> Result<(), Error> {
        self.register(name)
    }

    fn create_pregrasp(&mut self, name: &str, _gripper: &str, _handle: &str) -> Result<(), Error> {
        self.register(name)
    }

    fn create_placement(
        &mut self,
        name: &str,
        _contacts: &[String],
        _env_contacts: &[String],
    ) -> Result<(), Error> {
        self.register(name)
    }

    fn create_pre_placement(
        &mut self,
        name: &str,
        _contacts: &[String],
        _env_contacts: &[String],
        _width: f64,
    ) -> Result<(), Error> {
        self.register(name)
    }

    fn create_locked_joint(&mut self, name: &str, _joint: &str, _config: &[f64]) -> Result<(), Error> {
        self.register(name)
    }

    fn constraint_dimension(&self, name: &str) -> Result<usize, Error> {
        Ok(*self
            .dimensions
            .get(name)
            .unwrap_or(&self.default_dimension))
    }

    fn joints_of_object(&self, object: &str) -> Result<Vec<String>, Error> {
        Ok(self.joints.get(object).cloned().unwrap_or_default())
    }

    fn joint_config(&self, _joint: &str) -> Result<Vec<f64>, Error> {
        Ok(vec![0.0])
    }
}
