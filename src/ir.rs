use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::layout::LayoutError;

/// One employee or position in the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role_title: String,
    #[serde(default)]
    pub group_label: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl OrgNode {
    pub fn new(id: &str, display_name: &str, parent_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            role_title: String::new(),
            group_label: String::new(),
            parent_id: parent_id.map(str::to_string),
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role_title = role.to_string();
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group_label = group.to_string();
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Ordered node collection. Input order breaks sibling ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgChart {
    pub nodes: Vec<OrgNode>,
}

impl OrgChart {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn from_nodes(nodes: Vec<OrgNode>) -> Self {
        Self { nodes }
    }

    pub fn push(&mut self, node: OrgNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&OrgNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Parent id to child indices, built in one pass. Child lists keep input order.
    pub fn children_index(&self) -> HashMap<&str, Vec<usize>> {
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent_id.as_deref() {
                children.entry(parent).or_default().push(idx);
            }
        }
        children
    }

    /// `Ok(None)` for an empty chart; an error unless exactly one node has no parent.
    pub fn find_root(&self) -> Result<Option<&OrgNode>, LayoutError> {
        if self.nodes.is_empty() {
            return Ok(None);
        }
        let roots: Vec<&OrgNode> = self.nodes.iter().filter(|node| node.is_root()).collect();
        match roots.as_slice() {
            [] => Err(LayoutError::NoRoot),
            [root] => Ok(Some(*root)),
            many => Err(LayoutError::AmbiguousRoot {
                ids: many.iter().map(|node| node.id.clone()).collect(),
            }),
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(LayoutError::DuplicateId(node.id.clone()));
            }
        }
        Ok(())
    }

    /// Distinct group labels in first-appearance order, skipping blanks.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for node in &self.nodes {
            let label = node.group_label.as_str();
            if !label.is_empty() && !groups.contains(&label) {
                groups.push(label);
            }
        }
        groups
    }
}

/// Computed plane coordinates, valid for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
