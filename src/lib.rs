#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod scene;
pub mod text_metrics;
pub mod theme;
pub mod viewport;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, ViewportConfig, apply_config_file, load_config};
pub use ir::{OrgChart, OrgNode, Position};
pub use layout::{Layout, LayoutError, build_positions, compute_layout, route_edges};
pub use parser::{ParseError, parse_orgchart};
pub use render::render_svg;
pub use scene::{InteractionState, Scene, build_scene, render_node};
pub use theme::Theme;
pub use viewport::{Viewport, ViewportError, ViewportPoint};

use anyhow::Result;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
    pub interaction: InteractionState,
    /// Zoom factors applied in order after fitting the chart to the surface.
    pub zoom: Vec<f32>,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::from_config(Config::default())
    }

    pub fn modern() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self::from_config(Config {
            theme,
            render,
            ..Config::default()
        })
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            viewport: config.viewport,
            render: config.render,
            interaction: InteractionState::default(),
            zoom: Vec::new(),
        }
    }

    pub fn config(&self) -> Config {
        Config {
            theme: self.theme.clone(),
            layout: self.layout.clone(),
            viewport: self.viewport.clone(),
            render: self.render.clone(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Everything one render pass produces, before serialization.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub layout: Layout,
    pub viewport: Viewport,
    pub scene: Scene,
}

impl RenderedChart {
    pub fn to_svg(&self, config: &Config) -> String {
        render_svg(&self.scene, &self.viewport, &config.theme, &config.layout)
    }
}

/// Layout, fit, zoom and scene construction for an already parsed chart.
pub fn prepare_chart(
    chart: &OrgChart,
    config: &Config,
    interaction: &InteractionState,
    zoom: &[f32],
) -> Result<RenderedChart> {
    let layout = compute_layout(chart, &config.layout)?;
    let mut viewport = Viewport::fit(
        config.render.width,
        config.render.height,
        layout.width,
        layout.height,
    );
    for factor in zoom {
        viewport = viewport.zoom(*factor)?;
    }
    let scene = build_scene(&layout, chart, &config.theme, &config.layout, interaction);
    Ok(RenderedChart {
        layout,
        viewport,
        scene,
    })
}

pub fn render(input: &str) -> Result<String> {
    render_with_options(input, RenderOptions::default())
}

pub fn render_with_options(input: &str, options: RenderOptions) -> Result<String> {
    let parsed = parse_orgchart(input)?;
    let mut config = options.config();
    if let Some(init) = parsed.init_config {
        config = apply_config_file(config, init);
    }
    let rendered = prepare_chart(&parsed.chart, &config, &options.interaction, &options.zoom)?;
    Ok(rendered.to_svg(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_text_input_end_to_end() {
        let svg = render("orgchart\n  ceo[\"Ada\"]: CEO\n  cto[\"Grace\"]: CTO < ceo").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Grace"));
    }

    #[test]
    fn init_directive_overrides_options() {
        let input = "%%{init: {layout: {cardWidth: 260}}}%%\norgchart\n  a";
        let svg = render(input).unwrap();
        assert!(svg.contains("width=\"260.00\""));
    }

    #[test]
    fn invalid_zoom_is_reported() {
        let options = RenderOptions {
            zoom: vec![0.0],
            ..RenderOptions::default()
        };
        let err = render_with_options("orgchart\n  a", options).unwrap_err();
        assert!(err.to_string().contains("zoom factor"));
    }

    #[test]
    fn ambiguous_root_is_reported() {
        let err = render("orgchart\n  a\n  b").unwrap_err();
        assert!(err.to_string().contains("ambiguous root"));
    }
}
