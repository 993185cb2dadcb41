// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Declarative admissibility rules over grasp assignments.
//!
//! A [`Rule`] pairs gripper name patterns with handle name patterns and an
//! outcome. Compilation resolves each gripper pattern against the declared
//! gripper list once, producing per-gripper compiled handle patterns, so
//! evaluating an assignment never touches the regex compiler again.
//!
//! Evaluation is first-match-wins in declaration order; when no rule
//! applies, a configurable default (initially reject) decides.

use crate::errors::Error;
use crate::problem::Grasps;
use regex::Regex;

/// One declarative rule: for every gripper matching `grippers[j]`, the held
/// handle must match `handles[j]` for the rule to apply; if the rule
/// applies, `link` decides admissibility.
#[derive(Debug, Clone)]
pub struct Rule {
    pub grippers: Vec<String>,
    pub handles: Vec<String>,
    pub link: bool,
}

impl Rule {
    pub fn new(grippers: &[&str], handles: &[&str], link: bool) -> Self {
        Self {
            grippers: grippers.iter().map(|s| s.to_string()).collect(),
            handles: handles.iter().map(|s| s.to_string()).collect(),
            link,
        }
    }
}

/// A compiled rule: per gripper index, `None` (don't care) or the handle
/// pattern that gripper's held handle must match.
#[derive(Debug)]
struct CompiledRule {
    handle_patterns: Vec<Option<Regex>>,
    link: bool,
}

/// The admissibility predicate compiled from a rule list.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    /// Handle names, indexed like assignment values.
    handles: Vec<String>,
    default_accept: bool,
}

/// Compile a pattern with Python `re.match` semantics: anchored at the
/// start of the subject, unanchored at the end.
fn compile_anchored(pattern: &str) -> Result<Regex, Error> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

impl RuleSet {
    /// Compile `rules` against the declared gripper and handle name lists.
    ///
    /// Fails if a pattern is invalid, if a rule's pattern lists have
    /// mismatched lengths, or if two gripper patterns of one rule match the
    /// same gripper.
    pub fn compile(grippers: &[String], handles: &[String], rules: &[Rule]) -> Result<Self, Error> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (ir, rule) in rules.iter().enumerate() {
            if rule.grippers.len() > rule.handles.len() {
                return Err(Error::MismatchedRulePatterns {
                    rule: ir,
                    grippers: rule.grippers.len(),
                    handles: rule.handles.len(),
                });
            }
            let mut handle_patterns: Vec<Option<Regex>> = Vec::new();
            handle_patterns.resize_with(grippers.len(), || None);
            for (j, gripper_pattern) in rule.grippers.iter().enumerate() {
                let grc = compile_anchored(gripper_pattern)?;
                for (i, gripper) in grippers.iter().enumerate() {
                    if grc.is_match(gripper) {
                        if handle_patterns[i].is_some() {
                            return Err(Error::OverlappingRulePatterns {
                                rule: ir,
                                gripper: gripper.clone(),
                            });
                        }
                        handle_patterns[i] = Some(compile_anchored(&rule.handles[j])?);
                    }
                }
            }
            compiled.push(CompiledRule {
                handle_patterns,
                link: rule.link,
            });
        }
        Ok(Self {
            rules: compiled,
            handles: handles.to_vec(),
            default_accept: false,
        })
    }

    /// Outcome when no rule applies.
    pub fn set_default_accept(&mut self, accept: bool) {
        self.default_accept = accept;
    }

    /// Evaluate the predicate on an assignment.
    ///
    /// A gripper holding nothing is matched against the empty string, so a
    /// handle pattern matching `""` (e.g. `.*` or `^$`) selects the
    /// "ungrasped" case explicitly.
    pub fn allows(&self, grasps: &Grasps) -> bool {
        for rule in &self.rules {
            let applies = rule
                .handle_patterns
                .iter()
                .zip(grasps)
                .all(|(pattern, ih)| match pattern {
                    None => true,
                    Some(p) => {
                        let held = ih.map(|ih| self.handles[ih].as_str()).unwrap_or("");
                        p.is_match(held)
                    }
                });
            if applies {
                return rule.link;
            }
        }
        self.default_accept
    }
}
