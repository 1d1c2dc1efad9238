use super::*;

/// Places every node reachable from `root_id`, returning its center.
///
/// Children sit one `level_gap` below their parent and split the parent's
/// horizontal band into equal slots, in input order. Unreachable nodes are
/// left out of the map.
pub fn build_positions(
    chart: &OrgChart,
    root_id: &str,
    root_x: f32,
    root_y: f32,
    available_width: f32,
    level_gap: f32,
) -> BTreeMap<String, Position> {
    build_bands(chart, root_id, root_x, root_y, available_width, level_gap)
        .into_iter()
        .map(|(id, placed)| (id, placed.position))
        .collect()
}

/// Same walk as [`build_positions`], also reporting the band each node owns.
pub fn build_bands(
    chart: &OrgChart,
    root_id: &str,
    root_x: f32,
    root_y: f32,
    available_width: f32,
    level_gap: f32,
) -> BTreeMap<String, PlacedNode> {
    let mut placed = BTreeMap::new();
    let Some(root_idx) = chart.nodes.iter().position(|node| node.id == root_id) else {
        return placed;
    };
    let children = chart.children_index();
    let mut visited = vec![false; chart.len()];

    let root = PlacedNode {
        position: Position::new(root_x, root_y),
        band: Band {
            left: root_x - available_width / 2.0,
            width: available_width,
            depth: 0,
        },
    };

    // Explicit stack keeps very deep chains off the call stack.
    let mut stack = vec![(root_idx, root)];
    while let Some((idx, node)) = stack.pop() {
        if std::mem::replace(&mut visited[idx], true) {
            continue;
        }
        let id = chart.nodes[idx].id.as_str();
        placed.insert(id.to_string(), node);

        let Some(kids) = children.get(id) else {
            continue;
        };
        let slot = node.band.width / kids.len() as f32;
        let y = node.position.y + level_gap;
        for (order, &child) in kids.iter().enumerate().rev() {
            let left = node.band.left + slot * order as f32;
            stack.push((
                child,
                PlacedNode {
                    position: Position::new(left + slot / 2.0, y),
                    band: Band {
                        left,
                        width: slot,
                        depth: node.band.depth + 1,
                    },
                },
            ));
        }
    }

    placed
}

/// Band width handed to the root.
///
/// An explicit `available_width` wins. Otherwise the band is widened until the
/// narrowest slot in the tree fits a card plus `sibling_gap`, capped at
/// `max_width`. The even split per level is unchanged either way.
pub(super) fn resolve_available_width(chart: &OrgChart, root_id: &str, config: &LayoutConfig) -> f32 {
    let slot_needed = (config.card_width + config.sibling_gap).max(1.0);
    if let Some(width) = config.available_width {
        return width.max(0.0);
    }
    let unit = build_bands(chart, root_id, 0.0, 0.0, 1.0, 0.0);
    let narrowest = unit
        .values()
        .map(|placed| placed.band.width)
        .fold(1.0f32, f32::min);
    if narrowest <= 0.0 {
        return config.max_width.max(slot_needed);
    }
    (slot_needed / narrowest).clamp(slot_needed, config.max_width.max(slot_needed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OrgNode;

    fn chart(nodes: &[(&str, Option<&str>)]) -> OrgChart {
        OrgChart::from_nodes(
            nodes
                .iter()
                .map(|(id, parent)| OrgNode::new(id, id, *parent))
                .collect(),
        )
    }

    #[test]
    fn two_children_split_band_in_half() {
        let chart = chart(&[("A", None), ("B", Some("A")), ("C", Some("A"))]);
        let positions = build_positions(&chart, "A", 500.0, 80.0, 1000.0, 100.0);
        assert_eq!(positions["A"], Position::new(500.0, 80.0));
        assert_eq!(positions["B"], Position::new(250.0, 180.0));
        assert_eq!(positions["C"], Position::new(750.0, 180.0));
    }

    #[test]
    fn orphan_is_dropped_without_touching_others() {
        let with_orphan = chart(&[
            ("A", None),
            ("B", Some("A")),
            ("C", Some("A")),
            ("D", Some("Z")),
        ]);
        let without = chart(&[("A", None), ("B", Some("A")), ("C", Some("A"))]);
        let a = build_positions(&with_orphan, "A", 500.0, 80.0, 1000.0, 100.0);
        let b = build_positions(&without, "A", 500.0, 80.0, 1000.0, 100.0);
        assert!(!a.contains_key("D"));
        assert_eq!(a, b);
    }

    #[test]
    fn descendants_of_orphans_are_dropped() {
        let chart = chart(&[("A", None), ("D", Some("Z")), ("E", Some("D"))]);
        let positions = build_positions(&chart, "A", 0.0, 0.0, 100.0, 10.0);
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn single_node_sits_at_root_coordinates() {
        let chart = chart(&[("solo", None)]);
        let positions = build_positions(&chart, "solo", 12.5, 40.0, 300.0, 100.0);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions["solo"], Position::new(12.5, 40.0));
    }

    #[test]
    fn unknown_root_yields_empty_map() {
        let chart = chart(&[("A", None)]);
        assert!(build_positions(&chart, "missing", 0.0, 0.0, 100.0, 10.0).is_empty());
    }

    #[test]
    fn grandchildren_narrow_to_parent_slot() {
        let chart = chart(&[
            ("A", None),
            ("B", Some("A")),
            ("C", Some("A")),
            ("B1", Some("B")),
            ("B2", Some("B")),
            ("B3", Some("B")),
        ]);
        let bands = build_bands(&chart, "A", 600.0, 0.0, 1200.0, 100.0);
        assert_eq!(bands["B"].band.width, 600.0);
        assert_eq!(bands["B1"].band.width, 200.0);
        assert_eq!(bands["B1"].position, Position::new(100.0, 200.0));
        assert_eq!(bands["B3"].position, Position::new(500.0, 200.0));
        assert_eq!(bands["B3"].band.depth, 2);
        assert_eq!(bands["C"].position, Position::new(900.0, 100.0));
    }

    #[test]
    fn duplicate_self_reference_terminates() {
        let chart = chart(&[("A", None), ("A", Some("A"))]);
        let positions = build_positions(&chart, "A", 0.0, 0.0, 100.0, 10.0);
        assert_eq!(positions.len(), 1);
    }

    #[test]
    fn derived_width_fits_narrowest_slot() {
        let chart = chart(&[
            ("A", None),
            ("B", Some("A")),
            ("C", Some("A")),
            ("C1", Some("C")),
            ("C2", Some("C")),
        ]);
        let config = LayoutConfig::default();
        let width = resolve_available_width(&chart, "A", &config);
        let slot = config.card_width + config.sibling_gap;
        assert!((width - slot * 4.0).abs() < 1e-3);
    }

    #[test]
    fn explicit_width_wins() {
        let chart = chart(&[("A", None), ("B", Some("A"))]);
        let config = LayoutConfig {
            available_width: Some(640.0),
            ..LayoutConfig::default()
        };
        assert_eq!(resolve_available_width(&chart, "A", &config), 640.0);
    }

    #[test]
    fn derived_width_is_capped() {
        let mut nodes = vec![("root".to_string(), None)];
        let mut parent = "root".to_string();
        for depth in 0..12 {
            for sibling in 0..3 {
                nodes.push((format!("n{depth}-{sibling}"), Some(parent.clone())));
            }
            parent = format!("n{depth}-0");
        }
        let chart = OrgChart::from_nodes(
            nodes
                .iter()
                .map(|(id, parent)| OrgNode::new(id, id, parent.as_deref()))
                .collect(),
        );
        let config = LayoutConfig::default();
        assert_eq!(resolve_available_width(&chart, "root", &config), config.max_width);
    }
}
