use crate::config::{Config, apply_config_file, load_config};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_orgchart;
use crate::render::{write_output_png, write_output_svg};
use crate::scene::InteractionState;
use crate::prepare_chart;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const MAX_ZOOM_STEPS: i64 = 100;

#[derive(Parser, Debug)]
#[command(name = "orgc", version, about = "Organization chart renderer")]
pub struct Args {
    /// Input file (.json, .org or .md) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Surface width in pixels
    #[arg(short = 'w', long = "width", default_value_t = 1000.0)]
    pub width: f32,

    /// Surface height in pixels
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Zoom factor applied after fitting; repeat to chain (>1 zooms in)
    #[arg(short = 'z', long = "zoom", allow_negative_numbers = true)]
    pub zoom: Vec<f32>,

    /// Zoom in by the configured step this many times (negative zooms out)
    #[arg(
        long = "zoomSteps",
        default_value_t = 0,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-MAX_ZOOM_STEPS..=MAX_ZOOM_STEPS)
    )]
    pub zoom_steps: i32,

    /// Node id to draw as selected
    #[arg(long = "select")]
    pub select: Option<String>,

    /// Node id to draw as hovered
    #[arg(long = "hover")]
    pub hover: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut base_config = load_config(args.config.as_deref())?;
    base_config.render.width = args.width;
    base_config.render.height = args.height;

    let interaction = InteractionState {
        hovered: args.hover.clone(),
        selected: args.select.clone(),
    };
    let zoom = zoom_factors(&args.zoom, args.zoom_steps, base_config.viewport.zoom_step);

    let (input, is_markdown) = read_input(args.input.as_deref())?;
    let charts = if is_markdown {
        extract_orgchart_blocks(&input)
    } else {
        vec![input]
    };

    if charts.is_empty() {
        return Err(anyhow::anyhow!("No orgchart blocks found in input"));
    }

    let outputs: Vec<Option<PathBuf>> = if charts.len() == 1 {
        vec![args.output.clone()]
    } else {
        resolve_multi_outputs(args.output.as_deref(), args.output_format, charts.len())?
            .into_iter()
            .map(Some)
            .collect()
    };

    for (source, output) in charts.iter().zip(outputs) {
        let parsed = parse_orgchart(source)?;
        let mut config = base_config.clone();
        if let Some(init_cfg) = parsed.init_config {
            config = apply_config_file(config, init_cfg);
        }
        let rendered = prepare_chart(&parsed.chart, &config, &interaction, &zoom)?;
        tracing::info!(
            nodes = rendered.layout.nodes.len(),
            output = ?output,
            "rendering org chart"
        );
        write_rendered(&rendered, &parsed.chart, &config, args.output_format, output.as_deref())?;
    }

    Ok(())
}

fn write_rendered(
    rendered: &crate::RenderedChart,
    chart: &crate::ir::OrgChart,
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    match format {
        OutputFormat::Svg => write_output_svg(&rendered.to_svg(config), output),
        OutputFormat::Png => {
            let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            write_output_png(&rendered.to_svg(config), output, &config.render, &config.theme)
        }
        OutputFormat::Json => write_layout_dump(output, &rendered.layout, chart, &rendered.viewport),
    }
}

fn zoom_factors(explicit: &[f32], steps: i32, step: f32) -> Vec<f32> {
    let mut factors = explicit.to_vec();
    let stepped = if steps >= 0 { step } else { 1.0 / step };
    factors.extend(std::iter::repeat_n(stepped, steps.unsigned_abs() as usize));
    factors
}

fn read_input(path: Option<&Path>) -> Result<(String, bool)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, false));
        }
        let content = std::fs::read_to_string(path)?;
        let is_md = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| matches!(ext, "md" | "markdown"))
            .unwrap_or(false);
        return Ok((content, is_md));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, false))
}

fn extract_orgchart_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    let mut fence = String::new();

    for line in input.lines() {
        let trimmed = line.trim();
        if !in_block {
            if let Some(start_fence) = detect_orgchart_fence(trimmed) {
                in_block = true;
                fence = start_fence;
                continue;
            }
        } else if is_fence_end(trimmed, &fence) {
            in_block = false;
            blocks.push(current.join("\n"));
            current.clear();
            continue;
        }

        if in_block {
            current.push(line.to_string());
        }
    }

    blocks
}

fn detect_orgchart_fence(line: &str) -> Option<String> {
    for marker in ["```", "~~~"] {
        if let Some(rest) = line.strip_prefix(marker) {
            let rest = rest.trim_start_matches(marker.chars().next()?).trim();
            if rest.starts_with("orgchart") {
                return Some(marker.to_string());
            }
        }
    }
    None
}

fn is_fence_end(line: &str, fence: &str) -> bool {
    match line.strip_prefix(fence) {
        Some(rest) => rest.trim().is_empty(),
        None => false,
    }
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for markdown input"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("orgchart-{}.{}", idx + 1, ext)))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("orgchart");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect())
}
