use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::Position;

/// Horizontal slot a node owns, inherited from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub left: f32,
    pub width: f32,
    pub depth: usize,
}

impl Band {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn center(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedNode {
    pub position: Position,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    /// Card center.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub band: Band,
}

impl NodeLayout {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }
}

/// Cubic connector from the bottom edge of a parent card to the top edge of a child card.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    pub start: (f32, f32),
    pub control1: (f32, f32),
    pub control2: (f32, f32),
    pub end: (f32, f32),
}

impl EdgeLayout {
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            self.start.0,
            self.start.1,
            self.control1.0,
            self.control1.1,
            self.control2.0,
            self.control2.1,
            self.end.0,
            self.end.1
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub root: Option<String>,
    pub nodes: BTreeMap<String, NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            root: None,
            nodes: BTreeMap::new(),
            edges: Vec::new(),
            width,
            height,
        }
    }

    pub fn positions(&self) -> BTreeMap<String, Position> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.position()))
            .collect()
    }
}
