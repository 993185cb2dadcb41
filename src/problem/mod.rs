// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Problem description: grippers, objects, handles and contacts.
//!
//! Grippers and handles are identified by name and by a stable index.
//! Handle indices are flattened across objects in declaration order, so
//! each handle belongs to exactly one object (`object_of_handle`). All of
//! these tables are immutable once the problem is handed to the factory.
//!
//! This module also owns the naming scheme for states and transitions.
//! Names are the identity the graph backend and the transition dedup set
//! work with, so their exact format matters:
//!
//! - state: `"g1 grasps h1 : g2 grasps h4"`, or `"free"`;
//! - abbreviated state: `"0-0:1-3"`, or `"f"`;
//! - forward / backward transition: `"g1 > h1 | f"` / `"g1 < h1 | 0-0"`;
//! - loop transition: `"Loop | 0-0"`.

use crate::errors::Error;

/// A partial assignment of handles to grippers: `grasps[i]` is the handle
/// index held by gripper `i`, or `None`.
pub type Grasps = Vec<Option<usize>>;

/// The immutable description of one graph-generation problem.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    grippers: Vec<String>,
    objects: Vec<String>,
    /// Handle names, flattened across objects in declaration order.
    handles: Vec<String>,
    /// Per object, the indices into `handles` that belong to it.
    handles_per_object: Vec<Vec<usize>>,
    /// Per handle, the index of the object owning it.
    object_from_handle: Vec<usize>,
    /// Per object, the names of its contact surfaces.
    contacts_per_object: Vec<Vec<String>>,
    /// Names of the environment contact surfaces.
    env_contacts: Vec<String>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the grippers to consider, in order.
    pub fn set_grippers<I, S>(&mut self, grippers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grippers = grippers.into_iter().map(Into::into).collect();
    }

    /// Declare one object with its ordered handle names and contact names.
    ///
    /// Handle indices continue from previously declared objects.
    pub fn add_object<S, I, J>(&mut self, name: S, handles: I, contacts: J)
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = S>,
    {
        let io = self.objects.len();
        self.objects.push(name.into());
        let mut indices = Vec::new();
        for h in handles {
            indices.push(self.handles.len());
            self.handles.push(h.into());
            self.object_from_handle.push(io);
        }
        self.handles_per_object.push(indices);
        self.contacts_per_object
            .push(contacts.into_iter().map(Into::into).collect());
    }

    /// Declare the environment contact surfaces to consider.
    pub fn set_env_contacts<I, S>(&mut self, contacts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_contacts = contacts.into_iter().map(Into::into).collect();
    }

    pub fn grippers(&self) -> &[String] {
        &self.grippers
    }

    pub fn handles(&self) -> &[String] {
        &self.handles
    }

    pub fn objects(&self) -> &[String] {
        &self.objects
    }

    pub fn env_contacts(&self) -> &[String] {
        &self.env_contacts
    }

    /// Index of the object owning handle `ih`.
    pub fn object_of_handle(&self, ih: usize) -> usize {
        self.object_from_handle[ih]
    }

    /// Handle indices belonging to object `io`.
    pub fn handles_of_object(&self, io: usize) -> &[usize] {
        &self.handles_per_object[io]
    }

    /// Contact surface names of object `io`.
    pub fn contacts_of_object(&self, io: usize) -> &[String] {
        &self.contacts_per_object[io]
    }

    pub fn gripper_index(&self, name: &str) -> Result<usize, Error> {
        self.grippers
            .iter()
            .position(|g| g == name)
            .ok_or_else(|| Error::UnknownGripper { name: name.to_string() })
    }

    pub fn handle_index(&self, name: &str) -> Result<usize, Error> {
        self.handles
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::UnknownHandle { name: name.to_string() })
    }

    pub fn object_index(&self, name: &str) -> Result<usize, Error> {
        self.objects
            .iter()
            .position(|o| o == name)
            .ok_or_else(|| Error::UnknownObject { name: name.to_string() })
    }

    /// True iff some handle of object `io` is held in `grasps`.
    pub fn is_object_grasped(&self, grasps: &Grasps, io: usize) -> bool {
        self.handles_per_object[io]
            .iter()
            .any(|ih| grasps.contains(&Some(*ih)))
    }

    /// Human-readable (`abbrev = false`) or abbreviated state name.
    pub fn state_name(&self, grasps: &Grasps, abbrev: bool) -> String {
        let sep_gh = if abbrev { "-" } else { " grasps " };
        let sep = if abbrev { ":" } else { " : " };
        let fragments: Vec<String> = grasps
            .iter()
            .enumerate()
            .filter_map(|(ig, ih)| {
                ih.map(|ih| {
                    if abbrev {
                        format!("{}{}{}", ig, sep_gh, ih)
                    } else {
                        format!("{}{}{}", self.grippers[ig], sep_gh, self.handles[ih])
                    }
                })
            })
            .collect();
        if fragments.is_empty() {
            return if abbrev { "f" } else { "free" }.to_string();
        }
        fragments.join(sep)
    }

    /// Forward and backward names of the transition that makes gripper `ig`
    /// take the handle it holds in `to`.
    pub fn transition_names(&self, from: &Grasps, to: &Grasps, ig: usize) -> (String, String) {
        let g = &self.grippers[ig];
        let h = &self.handles[to[ig].expect("changed gripper holds a handle in the target state")];
        (
            format!("{} > {} | {}", g, h, self.state_name(from, true)),
            format!("{} < {} | {}", g, h, self.state_name(to, true)),
        )
    }

    /// Name of the loop transition staying inside the state of `grasps`.
    pub fn loop_name(&self, grasps: &Grasps) -> String {
        format!("Loop | {}", self.state_name(grasps, true))
    }
}
