use std::collections::HashMap;

use orgchart_renderer::layout::build_bands;
use orgchart_renderer::{OrgChart, OrgNode, Viewport, build_positions};
use proptest::prelude::*;

/// Connected tree: node `i > 0` reports to some earlier node.
fn tree_strategy() -> impl Strategy<Value = OrgChart> {
    (1usize..40)
        .prop_flat_map(|len| {
            let parents: Vec<BoxedStrategy<usize>> =
                (1..len).map(|i| (0..i).boxed()).collect();
            (Just(len), parents)
        })
        .prop_map(|(len, parents)| {
            let mut nodes = vec![OrgNode::new("n0", "Node 0", None)];
            for i in 1..len {
                let parent = format!("n{}", parents[i - 1]);
                nodes.push(OrgNode::new(&format!("n{i}"), &format!("Node {i}"), Some(parent.as_str())));
            }
            OrgChart::from_nodes(nodes)
        })
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (
        10.0f32..2000.0,
        10.0f32..2000.0,
        -500.0f32..500.0,
        -500.0f32..500.0,
        10.0f32..4000.0,
        10.0f32..4000.0,
    )
        .prop_map(|(width, height, origin_x, origin_y, scale_width, scale_height)| Viewport {
            width,
            height,
            origin_x,
            origin_y,
            scale_width,
            scale_height,
        })
}

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(b.abs()).max(10.0)
}

proptest! {
    #[test]
    fn layout_is_deterministic(chart in tree_strategy(), width in 100.0f32..5000.0) {
        let first = build_positions(&chart, "n0", width / 2.0, 80.0, width, 100.0);
        let second = build_positions(&chart, "n0", width / 2.0, 80.0, width, 100.0);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn root_sits_at_requested_point(
        chart in tree_strategy(),
        x in -1000.0f32..1000.0,
        y in -1000.0f32..1000.0,
    ) {
        let positions = build_positions(&chart, "n0", x, y, 800.0, 100.0);
        let root = positions["n0"];
        prop_assert_eq!((root.x, root.y), (x, y));
    }

    #[test]
    fn connected_trees_are_complete(chart in tree_strategy()) {
        let positions = build_positions(&chart, "n0", 500.0, 80.0, 1000.0, 100.0);
        prop_assert_eq!(positions.len(), chart.len());
        for node in &chart.nodes {
            prop_assert!(positions.contains_key(&node.id));
        }
    }

    #[test]
    fn orphans_never_appear(chart in tree_strategy(), orphans in 1usize..5) {
        let mut nodes = chart.nodes.clone();
        for i in 0..orphans {
            nodes.push(OrgNode::new(&format!("orphan{i}"), "Orphan", Some("missing")));
        }
        let with_orphans = OrgChart::from_nodes(nodes);
        let base = build_positions(&chart, "n0", 500.0, 80.0, 1000.0, 100.0);
        let positions = build_positions(&with_orphans, "n0", 500.0, 80.0, 1000.0, 100.0);
        prop_assert_eq!(base, positions);
    }

    #[test]
    fn sibling_bands_partition_parent_band(chart in tree_strategy(), width in 100.0f32..5000.0) {
        let bands = build_bands(&chart, "n0", width / 2.0, 0.0, width, 100.0);
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in &chart.nodes {
            if let Some(parent) = node.parent_id.as_deref() {
                children.entry(parent).or_default().push(node.id.as_str());
            }
        }
        for (parent, kids) in children {
            let parent_band = bands[parent].band;
            let expected = parent_band.width / kids.len() as f32;
            let mut cursor = parent_band.left;
            for kid in kids {
                let band = bands[kid].band;
                prop_assert!(close(band.width, expected));
                prop_assert!(close(band.left, cursor));
                prop_assert!(close(bands[kid].position.x, band.center()));
                cursor = band.right();
            }
            prop_assert!(close(cursor, parent_band.right()));
        }
    }

    #[test]
    fn zoom_round_trip_restores_rectangle(view in viewport_strategy(), factor in 0.1f32..10.0) {
        let back = view.zoom(factor).unwrap().zoom(1.0 / factor).unwrap();
        prop_assert!(close(back.origin_x, view.origin_x));
        prop_assert!(close(back.origin_y, view.origin_y));
        prop_assert!(close(back.scale_width, view.scale_width));
        prop_assert!(close(back.scale_height, view.scale_height));
        prop_assert!(close(back.width, view.width));
        prop_assert!(close(back.height, view.height));
    }

    #[test]
    fn zoom_keeps_center(view in viewport_strategy(), factor in 0.1f32..10.0) {
        let zoomed = view.zoom(factor).unwrap();
        let (cx, cy) = view.center();
        let (zx, zy) = zoomed.center();
        prop_assert!(close(cx, zx));
        prop_assert!(close(cy, zy));
    }
}
