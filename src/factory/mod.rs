// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The combinatorial enumerator driving graph generation.
//!
//! [`GraphFactory`] walks every partial gripper-to-handle assignment,
//! filters them through the compiled rules, creates one graph state per
//! distinct admissible assignment (memoized, so each assignment yields
//! exactly one node and one loop transition), and hands every admissible
//! single-grasp step to the waypoint transition synthesizer
//! (see [`transition`]).
//!
//! The walk is a plain recursion of depth at most `2 * min(G, H)`: each
//! level grasps one more handle with one more gripper and removes both from
//! the remaining lists. Depth advances by two per grasp, so a state's
//! priority reflects how many grasps deep it was first reached, independent
//! of enumeration order. Assignments are copied per call; nothing is ever
//! undone, and repeated `generate()` runs over the same problem produce an
//! isomorphic graph.

pub mod state;
pub mod transition;

pub use state::State;

use crate::backend::{ConstraintEngine, GraphBackend};
use crate::constraints::Constraints;
use crate::errors::Error;
use crate::problem::{Grasps, Problem};
use crate::rules::{Rule, RuleSet};
use crate::store::{ConstraintStore, ConstraintTriple, PlacementPolicy};
use std::collections::{HashMap, HashSet};

/// Index of a generated state in the factory's state table.
pub type StateId = usize;

/// One-shot generator of the grasp transition graph.
///
/// Owns the problem description, the constraint cache, the state table and
/// the transition dedup set; drives the [`GraphBackend`] and
/// [`ConstraintEngine`] collaborators. Invoke [`GraphFactory::generate`]
/// once per graph build.
pub struct GraphFactory<G, E> {
    problem: Problem,
    graph: G,
    engine: E,
    rules: Option<RuleSet>,
    store: ConstraintStore,
    /// Memoization table: assignment to state id.
    states: HashMap<Grasps, StateId>,
    state_data: Vec<State>,
    /// Name pairs of already-synthesized transitions.
    transitions: HashSet<(String, String)>,
}

impl<G: GraphBackend, E: ConstraintEngine> GraphFactory<G, E> {
    pub fn new(problem: Problem, graph: G, engine: E) -> Self {
        Self {
            problem,
            graph,
            engine,
            rules: None,
            store: ConstraintStore::new(PlacementPolicy::default()),
            states: HashMap::new(),
            state_data: Vec::new(),
            transitions: HashSet::new(),
        }
    }

    /// Compile and install the admissibility rules.
    ///
    /// Without rules, every assignment is admissible.
    pub fn set_rules(&mut self, rules: &[Rule]) -> Result<(), Error> {
        self.rules = Some(RuleSet::compile(
            self.problem.grippers(),
            self.problem.handles(),
            rules,
        )?);
        Ok(())
    }

    /// Install an already-compiled rule set, e.g. one with a non-default
    /// acceptance for unmatched assignments.
    pub fn set_rule_set(&mut self, rules: RuleSet) {
        self.rules = Some(rules);
    }

    /// Select the placement policy. Call before [`GraphFactory::generate`];
    /// the constraint cache is reset.
    pub fn set_placement_policy(&mut self, policy: PlacementPolicy) {
        self.store = ConstraintStore::new(policy);
    }

    /// Walk the grasp combinatorial and create all states and transitions.
    ///
    /// With zero grippers or zero handles this is a no-op producing an
    /// empty graph. Any collaborator failure aborts the run; the graph is
    /// all-or-nothing.
    pub fn generate(&mut self) -> Result<(), Error> {
        let grippers: Vec<usize> = (0..self.problem.grippers().len()).collect();
        let handles: Vec<usize> = (0..self.problem.handles().len()).collect();
        let grasps: Grasps = vec![None; grippers.len()];
        self.recurse(&grippers, &handles, grasps, 0)?;
        eprintln!(
            "[GraphFactory] generated {} states and {} transitions",
            self.state_data.len(),
            self.transitions.len()
        );
        Ok(())
    }

    /// Number of distinct states created so far.
    pub fn state_count(&self) -> usize {
        self.state_data.len()
    }

    /// Number of distinct logical transitions synthesized so far.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// The state created for an assignment, if it was admissible and reached.
    pub fn state(&self, grasps: &Grasps) -> Option<&State> {
        self.states.get(grasps).map(|&id| &self.state_data[id])
    }

    /// All created states, in creation order.
    pub fn states(&self) -> &[State] {
        &self.state_data
    }

    /// Grasp constraint triple by gripper and handle name.
    pub fn grasp_constraints(
        &mut self,
        gripper: &str,
        handle: &str,
    ) -> Result<ConstraintTriple, Error> {
        let ig = self.problem.gripper_index(gripper)?;
        let ih = self.problem.handle_index(handle)?;
        self.store.grasp(&mut self.engine, &self.problem, ig, ih)
    }

    /// Placement constraint triple by object name.
    pub fn placement_constraints(&mut self, object: &str) -> Result<ConstraintTriple, Error> {
        let io = self.problem.object_index(object)?;
        self.store.placement(&mut self.engine, &self.problem, io)
    }

    /// Give the collaborators back, typically to hand the populated graph
    /// to the planner.
    pub fn into_parts(self) -> (G, E) {
        (self.graph, self.engine)
    }

    fn allows(&self, grasps: &Grasps) -> bool {
        self.rules.as_ref().map_or(true, |r| r.allows(grasps))
    }

    /// One level of the enumeration: try every remaining (gripper, handle)
    /// pair on top of `grasps`.
    fn recurse(
        &mut self,
        grippers: &[usize],
        handles: &[usize],
        grasps: Grasps,
        depth: usize,
    ) -> Result<(), Error> {
        if grippers.is_empty() || handles.is_empty() {
            return Ok(());
        }

        let current = if self.allows(&grasps) {
            Some(self.obtain_state(&grasps, depth)?)
        } else {
            None
        };

        for (pos_g, &ig) in grippers.iter().enumerate() {
            let mut remaining_grippers = grippers.to_vec();
            remaining_grippers.remove(pos_g);

            for (pos_h, &ih) in handles.iter().enumerate() {
                let mut remaining_handles = handles.to_vec();
                remaining_handles.remove(pos_h);

                let mut next = grasps.clone();
                next[ig] = Some(ih);

                let next_state = if self.allows(&next) {
                    Some(self.obtain_state(&next, depth + 1)?)
                } else {
                    None
                };

                if let (Some(from), Some(to)) = (current, next_state) {
                    self.make_transition(from, to, ig)?;
                }

                self.recurse(&remaining_grippers, &remaining_handles, next, depth + 2)?;
            }
        }
        Ok(())
    }

    /// Get the state of an assignment, creating it (and its loop
    /// transition) on first admissible visit.
    fn obtain_state(&mut self, grasps: &Grasps, priority: usize) -> Result<StateId, Error> {
        if let Some(&id) = self.states.get(grasps) {
            return Ok(id);
        }
        let state = self.make_state(grasps, priority)?;
        let id = self.state_data.len();
        self.states.insert(grasps.clone(), id);
        self.state_data.push(state);
        self.make_loop_transition(id)?;
        Ok(id)
    }

    /// Create the node and derive the manifold/foliation of a new state.
    fn make_state(&mut self, grasps: &Grasps, priority: usize) -> Result<State, Error> {
        let mut manifold = Constraints::new();
        let mut foliation = Constraints::new();

        for (ig, ih) in grasps.iter().enumerate() {
            if let Some(ih) = *ih {
                let t = self.store.grasp(&mut self.engine, &self.problem, ig, ih)?;
                manifold += &t.validate;
                foliation += &t.parameterize;
            }
        }
        for io in 0..self.problem.objects().len() {
            if !self.problem.is_object_grasped(grasps, io) {
                let t = self.store.placement(&mut self.engine, &self.problem, io)?;
                manifold += &t.validate;
                foliation += &t.parameterize;
            }
        }

        let name = self.problem.state_name(grasps, false);
        let node = self.graph.create_node(&name, false, priority)?;
        self.graph.add_node_constraints(node, &manifold)?;

        Ok(State {
            grasps: grasps.clone(),
            node,
            name,
            priority,
            manifold,
            foliation,
        })
    }

    /// Create the self-edge representing motion within a state, constrained
    /// by its foliation.
    fn make_loop_transition(&mut self, id: StateId) -> Result<(), Error> {
        let state = &self.state_data[id];
        let name = self.problem.loop_name(&state.grasps);
        let node = state.node;
        let foliation = state.foliation.clone();

        let edge = self.graph.create_edge(node, node, &name, 0)?;
        self.graph.set_containing_node(edge, node)?;
        self.graph.add_edge_constraints(edge, &foliation)?;
        Ok(())
    }
}
