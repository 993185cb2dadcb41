// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for graph generation.
//!
//! Generation is all-or-nothing: every error aborts `generate()` and leaves
//! no partially-usable result. Duplicate transition requests are *not*
//! errors; they are silently deduplicated by the synthesizer.

use std::fmt;
use strum_macros::EnumCount as EnumCountMacro;

/// Errors that can occur while compiling rules or generating the graph.
#[derive(Debug, Clone, PartialEq, Eq, EnumCountMacro)]
pub enum Error {
    /// A rule pattern is not a valid regular expression.
    InvalidPattern { pattern: String, message: String },

    /// Within one rule, two gripper patterns matched the same gripper.
    /// Each gripper may be constrained by at most one pattern per rule.
    OverlappingRulePatterns { rule: usize, gripper: String },

    /// A rule has more gripper patterns than handle patterns.
    MismatchedRulePatterns {
        rule: usize,
        grippers: usize,
        handles: usize,
    },

    /// A gripper name was not declared on the problem.
    UnknownGripper { name: String },

    /// A handle name was not declared on the problem.
    UnknownHandle { name: String },

    /// An object name was not declared on the problem.
    UnknownObject { name: String },

    /// A transition needed no waypoint at all (every sub-phase constraint
    /// was empty). Direct single-hop transitions are not supported.
    DirectTransitionUnsupported { from: String, to: String },

    /// The external planning engine failed to build a constraint or answer
    /// an introspection query.
    Engine { operation: String, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPattern { pattern, message } => {
                write!(f, "Invalid rule pattern {:?}: {}", pattern, message)
            }
            Error::OverlappingRulePatterns { rule, gripper } => {
                write!(
                    f,
                    "Rule {} constrains gripper {:?} through two patterns",
                    rule, gripper
                )
            }
            Error::MismatchedRulePatterns {
                rule,
                grippers,
                handles,
            } => {
                write!(
                    f,
                    "Rule {} has {} gripper patterns but {} handle patterns",
                    rule, grippers, handles
                )
            }
            Error::UnknownGripper { name } => write!(f, "Unknown gripper {:?}", name),
            Error::UnknownHandle { name } => write!(f, "Unknown handle {:?}", name),
            Error::UnknownObject { name } => write!(f, "Unknown object {:?}", name),
            Error::DirectTransitionUnsupported { from, to } => {
                write!(
                    f,
                    "Transition {:?} -> {:?} needs no waypoint; direct transitions are not supported",
                    from, to
                )
            }
            Error::Engine { operation, message } => {
                write!(f, "Planning engine failed during {}: {}", operation, message)
            }
        }
    }
}

impl std::error::Error for Error {}
