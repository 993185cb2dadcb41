// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Waypoint transition synthesizer.
//!
//! A transition changes exactly one grasp. Geometrically it decomposes
//! into up to three sub-phases, each materialized as an intermediate
//! waypoint state when its constraint is non-trivial:
//!
//! 1. *pregrasp*: the gripper has reached its approach pose;
//! 2. *intersec*: grasp and placement constraints hold simultaneously;
//! 3. *preplace*: the object hovers above its placement surface.
//!
//! The chain is wired with one forward and one backward hop per link, and
//! registered on a single outward and a single inward composite edge; only
//! the composite edges are visible to the planner. Each hop belongs to
//! either the source or the target state (its foliation applies there), and
//! every hop except the first of each direction is eligible for
//! planner-side shortcutting.

use crate::backend::{ConstraintEngine, EdgeId, GraphBackend, NodeId};
use crate::constraints::Constraints;
use crate::errors::Error;
use crate::factory::{GraphFactory, StateId};
use crate::store::ConstraintTriple;

impl<G: GraphBackend, E: ConstraintEngine> GraphFactory<G, E> {
    /// Synthesize the bidirectional composite transition between two states
    /// differing only at gripper `ig`. Requests for an already-synthesized
    /// transition are silently ignored; the enumerator reaches the same
    /// logical transition through several recursion orders.
    pub(crate) fn make_transition(
        &mut self,
        from: StateId,
        to: StateId,
        ig: usize,
    ) -> Result<(), Error> {
        let sf = self.state_data[from].clone();
        let st = self.state_data[to].clone();

        let names = self.problem.transition_names(&sf.grasps, &st.grasps, ig);
        if self.transitions.contains(&names) {
            return Ok(());
        }

        let ih = st.grasps[ig].expect("target state holds a handle at the changed position");
        let io = self.problem.object_of_handle(ih);
        // If some handle of the object is already held in the source state,
        // the object is being manipulated and placement is irrelevant.
        let object_already_held = self.problem.is_object_grasped(&sf.grasps, io);

        let grasp = self.store.grasp(&mut self.engine, &self.problem, ig, ih)?;
        let place = if object_already_held {
            ConstraintTriple::default()
        } else {
            self.store.placement(&mut self.engine, &self.problem, io)?
        };

        // The transition's base manifold: the source manifold minus the
        // placement requirement being released.
        let manifold = &sf.manifold - &place.validate;

        let pregrasp = !grasp.approach.is_empty();
        let intersec = !grasp.validate.is_empty() && !place.validate.is_empty();
        let preplace = !place.approach.is_empty();
        let n_waypoints = pregrasp as usize + intersec as usize + preplace as usize;
        let n_hops = n_waypoints + 1;

        if n_waypoints == 0 {
            // Every sub-phase constraint is trivial; a direct edge pair
            // would be needed, which is not supported.
            return Err(Error::DirectTransitionUnsupported {
                from: sf.name,
                to: st.name,
            });
        }

        // Waypoint chain, in fixed sub-phase order.
        let mut chain = vec![sf.node];
        if pregrasp {
            chain.push(self.waypoint_node(
                &format!("{}_pregrasp", names.0),
                place.validate.clone() + &grasp.approach + &manifold,
            )?);
        }
        if intersec {
            chain.push(self.waypoint_node(
                &format!("{}_intersec", names.0),
                place.validate.clone() + &grasp.validate + &manifold,
            )?);
        }
        if preplace {
            chain.push(self.waypoint_node(
                &format!("{}_preplace", names.0),
                place.approach.clone() + &grasp.validate + &manifold,
            )?);
        }
        chain.push(st.node);

        let forward = self
            .graph
            .create_waypoint_edge(sf.node, st.node, &names.0, n_waypoints)?;
        let backward = self
            .graph
            .create_waypoint_edge(st.node, sf.node, &names.1, n_waypoints)?;

        let mut hops: Vec<(EdgeId, EdgeId)> = Vec::with_capacity(n_hops);
        for i in 0..n_hops {
            let forward_name = format!("{}_{}{}", names.0, i, i + 1);
            let backward_name = format!("{}_{}{}", names.1, i + 1, i);
            let f = self
                .graph
                .create_edge(chain[i], chain[i + 1], &forward_name, -1)?;
            let b = self
                .graph
                .create_edge(chain[i + 1], chain[i], &backward_name, -1)?;
            self.graph.set_waypoint(forward, i, f, chain[i + 1])?;
            self.graph.set_waypoint(backward, n_hops - 1 - i, b, chain[i])?;
            hops.push((f, b));
        }

        // Hops before the grasp is established happen still in the source
        // configuration; the rest already in the target's.
        let source_owned = if grasp.validate.is_empty() {
            0
        } else {
            1 + pregrasp as usize
        };
        for (i, &(f, b)) in hops.iter().enumerate() {
            let (owner, foliation) = if i < source_owned {
                (sf.node, &sf.foliation)
            } else {
                (st.node, &st.foliation)
            };
            self.graph.set_containing_node(f, owner)?;
            self.graph.add_edge_constraints(f, foliation)?;
            self.graph.set_containing_node(b, owner)?;
            self.graph.add_edge_constraints(b, foliation)?;
        }

        // All hops shortcuttable except the first of each direction, which
        // encodes the irreducible approach motion.
        for i in 0..n_hops - 1 {
            self.graph.set_short(hops[i + 1].0, true)?;
            self.graph.set_short(hops[i].1, true)?;
        }

        self.transitions.insert(names);
        Ok(())
    }

    fn waypoint_node(&mut self, name: &str, constraints: Constraints) -> Result<NodeId, Error> {
        let node = self.graph.create_node(name, true, 0)?;
        self.graph.add_node_constraints(node, &constraints)?;
        Ok(node)
    }
}
