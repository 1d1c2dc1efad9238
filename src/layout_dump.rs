use crate::ir::OrgChart;
use crate::layout::Layout;
use crate::viewport::Viewport;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub root: Option<String>,
    pub width: f32,
    pub height: f32,
    pub viewport: Viewport,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    /// Ids present in the input but unreachable from the root.
    pub dropped: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub display_name: String,
    pub role_title: String,
    pub group_label: String,
    pub x: f32,
    pub y: f32,
    pub depth: usize,
    pub band_left: f32,
    pub band_width: f32,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
    pub path: String,
}

impl LayoutDump {
    /// Nodes are listed in input order so dumps diff cleanly against the source records.
    pub fn from_layout(layout: &Layout, chart: &OrgChart, viewport: &Viewport) -> Self {
        let mut nodes = Vec::new();
        let mut dropped = Vec::new();
        for node in &chart.nodes {
            let Some(placed) = layout.nodes.get(&node.id) else {
                dropped.push(node.id.clone());
                continue;
            };
            nodes.push(NodeDump {
                id: node.id.clone(),
                display_name: node.display_name.clone(),
                role_title: node.role_title.clone(),
                group_label: node.group_label.clone(),
                x: placed.x,
                y: placed.y,
                depth: placed.band.depth,
                band_left: placed.band.left,
                band_width: placed.band.width,
            });
        }

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
                points: [edge.start, edge.control1, edge.control2, edge.end]
                    .iter()
                    .map(|(x, y)| [*x, *y])
                    .collect(),
                path: edge.to_svg_path(),
            })
            .collect();

        LayoutDump {
            root: layout.root.clone(),
            width: layout.width,
            height: layout.height,
            viewport: *viewport,
            nodes,
            edges,
            dropped,
        }
    }
}

pub fn write_layout_dump(
    path: Option<&Path>,
    layout: &Layout,
    chart: &OrgChart,
    viewport: &Viewport,
) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout, chart, viewport);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &dump)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}
