use super::*;

/// One connector per node whose own position and parent position are both known.
///
/// The curve leaves the parent half a card below its center and enters the
/// child half a card above its center; both control points sit on the
/// vertical midpoint, giving a symmetric S-curve.
pub fn route_edges(
    chart: &OrgChart,
    positions: &BTreeMap<String, Position>,
    card_height: f32,
) -> Vec<EdgeLayout> {
    let half = card_height / 2.0;
    let mut edges = Vec::new();
    for node in &chart.nodes {
        let Some(parent_id) = node.parent_id.as_deref() else {
            continue;
        };
        let (Some(parent), Some(child)) = (positions.get(parent_id), positions.get(&node.id)) else {
            continue;
        };
        let start = (parent.x, parent.y + half);
        let end = (child.x, child.y - half);
        let mid_y = (start.1 + end.1) / 2.0;
        edges.push(EdgeLayout {
            from: parent_id.to_string(),
            to: node.id.clone(),
            start,
            control1: (start.0, mid_y),
            control2: (end.0, mid_y),
            end,
        });
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::OrgNode;

    #[test]
    fn curve_terminates_at_card_edges() {
        let chart = OrgChart::from_nodes(vec![
            OrgNode::new("A", "A", None),
            OrgNode::new("B", "B", Some("A")),
        ]);
        let mut positions = BTreeMap::new();
        positions.insert("A".to_string(), Position::new(100.0, 80.0));
        positions.insert("B".to_string(), Position::new(40.0, 180.0));

        let edges = route_edges(&chart, &positions, 60.0);
        assert_eq!(edges.len(), 1);
        let edge = &edges[0];
        assert_eq!(edge.start, (100.0, 110.0));
        assert_eq!(edge.end, (40.0, 150.0));
        assert_eq!(edge.control1, (100.0, 130.0));
        assert_eq!(edge.control2, (40.0, 130.0));
        assert_eq!(
            edge.to_svg_path(),
            "M 100.00 110.00 C 100.00 130.00, 40.00 130.00, 40.00 150.00"
        );
    }

    #[test]
    fn missing_endpoints_emit_nothing() {
        let chart = OrgChart::from_nodes(vec![
            OrgNode::new("A", "A", None),
            OrgNode::new("D", "D", Some("Z")),
            OrgNode::new("E", "E", Some("A")),
        ]);
        let mut positions = BTreeMap::new();
        positions.insert("A".to_string(), Position::new(0.0, 0.0));
        assert!(route_edges(&chart, &positions, 60.0).is_empty());
    }
}
