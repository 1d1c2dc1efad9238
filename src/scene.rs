//! Renderer-agnostic draw instructions.
//!
//! A [`Scene`] is what a backend (SVG here, a canvas or retained UI tree
//! elsewhere) consumes: connector curves, one card per placed node and the
//! hit regions those cards cover. Hover and selection are owned by the host
//! as an [`InteractionState`] and only read here.

use crate::config::LayoutConfig;
use crate::ir::{OrgChart, OrgNode, Position};
use crate::layout::{EdgeLayout, Layout};
use crate::text_metrics::fit_text;
use crate::theme::Theme;
use crate::viewport::{Viewport, ViewportPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardState {
    #[default]
    Default,
    Hovered,
    Selected,
}

/// Host-owned pointer state. At most one node is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub hovered: Option<String>,
    pub selected: Option<String>,
}

impl InteractionState {
    pub fn state_of(&self, id: &str) -> CardState {
        if self.selected.as_deref() == Some(id) {
            CardState::Selected
        } else if self.hovered.as_deref() == Some(id) {
            CardState::Hovered
        } else {
            CardState::Default
        }
    }

    /// Records the result of [`Scene::click`]; a hit replaces any previous selection.
    pub fn apply_click(&mut self, hit: Option<String>) {
        if hit.is_some() {
            self.selected = hit;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub name: String,
    pub role: String,
    pub group_color: Option<String>,
    pub state: CardState,
}

impl Card {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Fixed-size card centered horizontally on `position.x`, vertically on `position.y`.
pub fn render_node(
    node: &OrgNode,
    position: Position,
    state: CardState,
    group_color: Option<&str>,
    theme: &Theme,
    config: &LayoutConfig,
) -> Card {
    let stripe = if group_color.is_some() { config.group_stripe_width } else { 0.0 };
    let text_width = (config.card_width - config.label_padding_x * 2.0 - stripe).max(0.0);
    Card {
        id: node.id.clone(),
        x: position.x - config.card_width / 2.0,
        y: position.y - config.card_height / 2.0,
        width: config.card_width,
        height: config.card_height,
        name: fit_text(&node.display_name, text_width, theme.name_font_size, &theme.font_family),
        role: fit_text(&node.role_title, text_width, theme.role_font_size, &theme.font_family),
        group_color: group_color.map(str::to_string),
        state,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub edges: Vec<EdgeLayout>,
    /// Draw order; later cards sit on top.
    pub cards: Vec<Card>,
}

pub fn build_scene(
    layout: &Layout,
    chart: &OrgChart,
    theme: &Theme,
    config: &LayoutConfig,
    interaction: &InteractionState,
) -> Scene {
    let groups = chart.groups();
    let cards = chart
        .nodes
        .iter()
        .filter_map(|node| {
            let placed = layout.nodes.get(&node.id)?;
            let group_color = groups
                .iter()
                .position(|group| *group == node.group_label)
                .and_then(|idx| theme.group_color(idx));
            Some(render_node(
                node,
                placed.position(),
                interaction.state_of(&node.id),
                group_color,
                theme,
                config,
            ))
        })
        .collect();

    Scene {
        width: layout.width,
        height: layout.height,
        edges: layout.edges.clone(),
        cards,
    }
}

impl Scene {
    /// Topmost card under a logical point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&Card> {
        self.cards.iter().rev().find(|card| card.contains(x, y))
    }

    /// Resolves a click at viewport-relative `point`.
    ///
    /// On a hit, `on_select` receives the full node record and the original
    /// viewport coordinates, and the hit id is returned. A miss returns `None`
    /// and leaves the callback untouched.
    pub fn click<F>(
        &self,
        viewport: &Viewport,
        point: ViewportPoint,
        chart: &OrgChart,
        mut on_select: F,
    ) -> Option<String>
    where
        F: FnMut(&OrgNode, ViewportPoint),
    {
        let (x, y) = viewport.to_logical(point);
        let card = self.hit_test(x, y)?;
        let node = chart.get(&card.id)?;
        tracing::debug!(id = %node.id, x = point.x, y = point.y, "card selected");
        on_select(node, point);
        Some(card.id.clone())
    }

    pub fn hover(&self, viewport: &Viewport, point: ViewportPoint) -> Option<String> {
        let (x, y) = viewport.to_logical(point);
        self.hit_test(x, y).map(|card| card.id.clone())
    }
}
