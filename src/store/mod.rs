// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Memoized grasp and placement constraint triples.
//!
//! Building a constraint is an engine round-trip, so each (gripper, handle)
//! grasp and each object placement is built at most once per generation and
//! cached by index. The cache is append-only and keyed by immutable
//! identity; entries are never invalidated.
//!
//! A triple holds, in order: the constraint validating the manifold, the
//! constraint parameterizing it (the complement, or a joint lock under the
//! relaxed placement policy), and the approach (pre-grasp / pre-placement)
//! constraint.

use crate::backend::ConstraintEngine;
use crate::constraints::Constraints;
use crate::errors::Error;
use crate::problem::Problem;
use std::collections::HashMap;

/// Gap between an object and its placement surface in the pre-placement
/// constraint, in meters.
const PRE_PLACEMENT_WIDTH: f64 = 0.05;

/// How placement manifolds are parameterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementPolicy {
    /// Parameterize by the complement of the placement constraint.
    Strict,
    /// Parameterize by locking every joint of the object's kinematic
    /// sub-tree at its current configuration, independent of the placement
    /// constraint.
    #[default]
    Relaxed,
}

/// (validate, parameterize, approach) constraint triple for one grasp or
/// one placement.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTriple {
    /// Validates the manifold (the grasp holds / the object is placed).
    pub validate: Constraints,
    /// Parameterizes motion within the manifold.
    pub parameterize: Constraints,
    /// Validates the approach sub-phase (pre-grasp / pre-placement).
    pub approach: Constraints,
}

impl ConstraintTriple {
    fn empty() -> Self {
        Self::default()
    }
}

/// Cache of built constraint triples, one entry per (gripper, handle) pair
/// and per object.
#[derive(Debug, Default)]
pub struct ConstraintStore {
    grasps: HashMap<(usize, usize), ConstraintTriple>,
    placements: HashMap<usize, ConstraintTriple>,
    policy: PlacementPolicy,
}

/// Keep only the names naming a constraint of non-zero dimension.
fn non_trivial<E: ConstraintEngine>(
    engine: &E,
    names: Vec<String>,
) -> Result<Constraints, Error> {
    let mut kept = Vec::new();
    for n in names {
        if engine.constraint_dimension(&n)? > 0 {
            kept.push(n);
        }
    }
    Ok(Constraints::from_numerical(kept))
}

impl ConstraintStore {
    pub fn new(policy: PlacementPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    /// Grasp triple for gripper `ig` holding handle `ih`, built on first use.
    pub fn grasp<E: ConstraintEngine>(
        &mut self,
        engine: &mut E,
        problem: &Problem,
        ig: usize,
        ih: usize,
    ) -> Result<ConstraintTriple, Error> {
        if let Some(triple) = self.grasps.get(&(ig, ih)) {
            return Ok(triple.clone());
        }
        let triple = build_grasp(engine, &problem.grippers()[ig], &problem.handles()[ih])?;
        self.grasps.insert((ig, ih), triple.clone());
        Ok(triple)
    }

    /// Placement triple for object `io`, built on first use.
    pub fn placement<E: ConstraintEngine>(
        &mut self,
        engine: &mut E,
        problem: &Problem,
        io: usize,
    ) -> Result<ConstraintTriple, Error> {
        if let Some(triple) = self.placements.get(&io) {
            return Ok(triple.clone());
        }
        let triple = match self.policy {
            PlacementPolicy::Strict => build_strict_placement(engine, problem, io)?,
            PlacementPolicy::Relaxed => build_relaxed_placement(engine, problem, io)?,
        };
        self.placements.insert(io, triple.clone());
        Ok(triple)
    }
}

fn build_grasp<E: ConstraintEngine>(
    engine: &mut E,
    gripper: &str,
    handle: &str,
) -> Result<ConstraintTriple, Error> {
    let name = format!("{} grasps {}", gripper, handle);
    let pre_name = format!("{} pregrasps {}", gripper, handle);
    engine.create_grasp(&name, gripper, handle)?;
    engine.create_pregrasp(&pre_name, gripper, handle)?;
    Ok(ConstraintTriple {
        validate: non_trivial(engine, vec![name.clone()])?,
        parameterize: non_trivial(engine, vec![format!("{}/complement", name)])?,
        approach: non_trivial(engine, vec![pre_name])?,
    })
}

/// Lock every joint of the object's sub-tree at its current configuration
/// and return the locked joint names.
fn lock_object_joints<E: ConstraintEngine>(
    engine: &mut E,
    object: &str,
) -> Result<Vec<String>, Error> {
    let mut locked = Vec::new();
    for joint in engine.joints_of_object(object)? {
        let config = engine.joint_config(&joint)?;
        engine.create_locked_joint(&joint, &joint, &config)?;
        locked.push(joint);
    }
    Ok(locked)
}

/// True iff the object has no usable placement: either it declares no
/// contact surface or the environment declares none.
fn no_placement(problem: &Problem, io: usize) -> bool {
    problem.contacts_of_object(io).is_empty() || problem.env_contacts().is_empty()
}

fn build_placement_pair<E: ConstraintEngine>(
    engine: &mut E,
    problem: &Problem,
    io: usize,
) -> Result<(String, String), Error> {
    let object = &problem.objects()[io];
    let name = format!("place_{}", object);
    let pre_name = format!("preplace_{}", object);
    engine.create_placement(&name, problem.contacts_of_object(io), problem.env_contacts())?;
    engine.create_pre_placement(
        &pre_name,
        problem.contacts_of_object(io),
        problem.env_contacts(),
        PRE_PLACEMENT_WIDTH,
    )?;
    Ok((name, pre_name))
}

fn build_strict_placement<E: ConstraintEngine>(
    engine: &mut E,
    problem: &Problem,
    io: usize,
) -> Result<ConstraintTriple, Error> {
    if no_placement(problem, io) {
        return Ok(ConstraintTriple::empty());
    }
    let (name, pre_name) = build_placement_pair(engine, problem, io)?;
    Ok(ConstraintTriple {
        validate: non_trivial(engine, vec![name.clone()])?,
        parameterize: non_trivial(engine, vec![format!("{}/complement", name)])?,
        approach: non_trivial(engine, vec![pre_name])?,
    })
}

fn build_relaxed_placement<E: ConstraintEngine>(
    engine: &mut E,
    problem: &Problem,
    io: usize,
) -> Result<ConstraintTriple, Error> {
    let locked = lock_object_joints(engine, &problem.objects()[io])?;
    if no_placement(problem, io) {
        return Ok(ConstraintTriple {
            validate: Constraints::new(),
            parameterize: Constraints::from_locked_joints(locked),
            approach: Constraints::new(),
        });
    }
    let (name, pre_name) = build_placement_pair(engine, problem, io)?;
    Ok(ConstraintTriple {
        validate: non_trivial(engine, vec![name])?,
        parameterize: Constraints::from_locked_joints(locked),
        approach: non_trivial(engine, vec![pre_name])?,
    })
}
