mod edges;
mod error;
mod tree;
pub(crate) mod types;
pub use edges::route_edges;
pub use error::LayoutError;
pub use tree::{build_bands, build_positions};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{OrgChart, Position};
use std::collections::BTreeMap;

/// Full layout pass: validate, locate the root, place every reachable node, route connectors.
///
/// An empty chart is a valid empty layout. Zero or several roots and
/// duplicate ids are rejected; orphans are dropped.
pub fn compute_layout(chart: &OrgChart, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    chart.validate()?;
    let padding = config.padding.max(0.0);
    let Some(root) = chart.find_root()? else {
        tracing::debug!("empty chart, nothing to lay out");
        return Ok(Layout::empty(padding * 2.0, padding * 2.0));
    };

    let available_width = tree::resolve_available_width(chart, &root.id, config);
    let root_x = padding + available_width / 2.0;
    let placed = build_bands(
        chart,
        &root.id,
        root_x,
        config.root_y,
        available_width,
        config.level_gap,
    );

    for node in chart.nodes.iter().filter(|node| !placed.contains_key(&node.id)) {
        tracing::debug!(
            id = %node.id,
            parent = node.parent_id.as_deref().unwrap_or_default(),
            "dropping node unreachable from root"
        );
    }

    let mut nodes = BTreeMap::new();
    let mut max_bottom = config.root_y + config.card_height / 2.0;
    for (id, entry) in &placed {
        max_bottom = max_bottom.max(entry.position.y + config.card_height / 2.0);
        nodes.insert(
            id.clone(),
            NodeLayout {
                id: id.clone(),
                x: entry.position.x,
                y: entry.position.y,
                width: config.card_width,
                height: config.card_height,
                band: entry.band,
            },
        );
    }

    let positions: BTreeMap<String, Position> = placed
        .iter()
        .map(|(id, entry)| (id.clone(), entry.position))
        .collect();
    let edges = route_edges(chart, &positions, config.card_height);

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        width = available_width,
        "computed org chart layout"
    );

    Ok(Layout {
        root: Some(root.id.clone()),
        nodes,
        edges,
        width: available_width + padding * 2.0,
        height: max_bottom + padding,
    })
}
