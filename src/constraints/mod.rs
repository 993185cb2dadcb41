// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Opaque constraint-set algebra.
//!
//! The core never inspects geometric constraints; it only combines them.
//! A [`Constraints`] value names the numerical constraints and locked joints
//! registered with the external planning engine, and supports the three
//! operations the generator needs:
//!
//! - union (`+` / `+=`), used to build state manifolds and foliations,
//! - subtraction (`-`), used to drop a placement requirement from a
//!   manifold while keeping the grasp requirements,
//! - emptiness test, used to decide which waypoint sub-phases exist.
//!
//! Union keeps declaration order and deduplicates by name, so repeated
//! additions of the same constraint are harmless.

use std::ops::{Add, AddAssign, Sub};

/// A set of named constraints held by the external planning engine.
///
/// Numerical constraints and locked joints are kept in separate lists
/// because the engine consumes them through different channels; the algebra
/// treats both uniformly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
    numerical: Vec<String>,
    locked_joints: Vec<String>,
}

impl Constraints {
    /// The empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set of numerical constraints, in order, deduplicated by name.
    pub fn from_numerical<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut c = Self::new();
        for n in names {
            push_unique(&mut c.numerical, n);
        }
        c
    }

    /// A set of locked-joint constraints, in order, deduplicated by name.
    pub fn from_locked_joints<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut c = Self::new();
        for n in names {
            push_unique(&mut c.locked_joints, n);
        }
        c
    }

    /// True iff the set holds no constraint of either kind.
    pub fn is_empty(&self) -> bool {
        self.numerical.is_empty() && self.locked_joints.is_empty()
    }

    /// Names of the numerical constraints, in insertion order.
    pub fn numerical(&self) -> &[String] {
        &self.numerical
    }

    /// Names of the locked joints, in insertion order.
    pub fn locked_joints(&self) -> &[String] {
        &self.locked_joints
    }
}

fn push_unique(list: &mut Vec<String>, name: String) {
    if !list.iter().any(|n| *n == name) {
        list.push(name);
    }
}

impl AddAssign<&Constraints> for Constraints {
    fn add_assign(&mut self, rhs: &Constraints) {
        for n in &rhs.numerical {
            push_unique(&mut self.numerical, n.clone());
        }
        for n in &rhs.locked_joints {
            push_unique(&mut self.locked_joints, n.clone());
        }
    }
}

impl Add<&Constraints> for Constraints {
    type Output = Constraints;

    fn add(mut self, rhs: &Constraints) -> Constraints {
        self += rhs;
        self
    }
}

impl Sub<&Constraints> for &Constraints {
    type Output = Constraints;

    /// Removes from `self` every constraint named in `rhs`.
    fn sub(self, rhs: &Constraints) -> Constraints {
        Constraints {
            numerical: self
                .numerical
                .iter()
                .filter(|n| !rhs.numerical.contains(n))
                .cloned()
                .collect(),
            locked_joints: self
                .locked_joints
                .iter()
                .filter(|n| !rhs.locked_joints.contains(n))
                .cloned()
                .collect(),
        }
    }
}
