use std::path::Path;

use orgchart_renderer::{
    InteractionState, LayoutConfig, OrgChart, OrgNode, Position, RenderOptions, Theme,
    apply_config_file, build_positions, compute_layout, parse_orgchart, prepare_chart,
    render_with_options, route_edges,
};

fn fixture(rel: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    std::fs::read_to_string(&path).expect("fixture read failed")
}

fn chart(nodes: &[(&str, Option<&str>)]) -> OrgChart {
    OrgChart::from_nodes(
        nodes
            .iter()
            .map(|(id, parent)| OrgNode::new(id, id, *parent))
            .collect(),
    )
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["basic.json", "orphans.json", "team.org", "single.org"];
    for rel in candidates {
        let svg = render_with_options(&fixture(rel), RenderOptions::modern())
            .unwrap_or_else(|err| panic!("{rel}: {err}"));
        assert!(svg.contains("<svg"), "{rel}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{rel}: missing </svg tag");
    }
}

#[test]
fn scenario_two_children_split_the_band() {
    let chart = chart(&[("A", None), ("B", Some("A")), ("C", Some("A"))]);
    let positions = build_positions(&chart, "A", 500.0, 80.0, 1000.0, 100.0);
    assert_eq!(positions.len(), 3);
    assert_eq!(positions["A"], Position::new(500.0, 80.0));
    assert_eq!(positions["B"], Position::new(250.0, 180.0));
    assert_eq!(positions["C"], Position::new(750.0, 180.0));
}

#[test]
fn scenario_orphan_is_excluded() {
    let parsed = parse_orgchart(&fixture("orphans.json")).unwrap();
    let positions = build_positions(&parsed.chart, "A", 500.0, 80.0, 1000.0, 100.0);
    assert!(!positions.contains_key("D"));
    assert!(!positions.contains_key("E"));
    assert_eq!(positions["B"], Position::new(250.0, 180.0));
    assert_eq!(positions["C"], Position::new(750.0, 180.0));

    let edges = route_edges(&parsed.chart, &positions, 60.0);
    assert_eq!(edges.len(), 2);
}

#[test]
fn scenario_single_node_has_no_edges() {
    let parsed = parse_orgchart(&fixture("single.org")).unwrap();
    let positions = build_positions(&parsed.chart, "founder", 320.0, 80.0, 640.0, 100.0);
    assert_eq!(positions.len(), 1);
    assert_eq!(positions["founder"], Position::new(320.0, 80.0));
    assert!(route_edges(&parsed.chart, &positions, 60.0).is_empty());

    let layout = compute_layout(&parsed.chart, &LayoutConfig::default()).unwrap();
    assert!(layout.edges.is_empty());
}

#[test]
fn init_directive_changes_level_gap() {
    let parsed = parse_orgchart(&fixture("team.org")).unwrap();
    let config = apply_config_file(
        orgchart_renderer::Config::default(),
        parsed.init_config.expect("team.org carries an init directive"),
    );
    assert_eq!(config.layout.level_gap, 120.0);
    assert_eq!(config.theme.card_fill, Theme::modern().card_fill);

    let layout = compute_layout(&parsed.chart, &config.layout).unwrap();
    let vp = &layout.nodes["vp"];
    let des = &layout.nodes["des"];
    assert_eq!(des.y - vp.y, 240.0);
}

#[test]
fn sibling_order_follows_input_order() {
    let parsed = parse_orgchart(&fixture("basic.json")).unwrap();
    let layout = compute_layout(&parsed.chart, &LayoutConfig::default()).unwrap();
    assert!(layout.nodes["cto"].x < layout.nodes["cfo"].x);
    assert!(layout.nodes["eng1"].x < layout.nodes["eng2"].x);
    assert!(layout.nodes["eng2"].x < layout.nodes["acct"].x);
}

#[test]
fn prepared_chart_fits_the_surface() {
    let parsed = parse_orgchart(&fixture("basic.json")).unwrap();
    let config = orgchart_renderer::Config::default();
    let rendered = prepare_chart(&parsed.chart, &config, &InteractionState::default(), &[]).unwrap();
    let viewport = rendered.viewport;
    assert_eq!(viewport.width, config.render.width);
    assert_eq!(viewport.height, config.render.height);
    assert!(viewport.scale_width >= rendered.layout.width - 1e-3);
    assert!(viewport.scale_height >= rendered.layout.height - 1e-3);

    let zoomed =
        prepare_chart(&parsed.chart, &config, &InteractionState::default(), &[2.0, 0.5]).unwrap();
    assert!((zoomed.viewport.scale_width - viewport.scale_width).abs() < 1e-2);
    assert!((zoomed.viewport.origin_x - viewport.origin_x).abs() < 1e-2);
}

#[test]
fn selected_card_is_marked_in_svg() {
    let options = RenderOptions {
        interaction: InteractionState {
            hovered: None,
            selected: Some("cfo".to_string()),
        },
        ..RenderOptions::classic()
    };
    let svg = render_with_options(&fixture("basic.json"), options).unwrap();
    assert!(svg.contains("org-node selected\" data-id=\"cfo\""));
    assert_eq!(svg.matches("org-node selected").count(), 1);
}
