use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub card_width: f32,
    pub card_height: f32,
    /// Vertical distance between a parent's row and its children's row.
    pub level_gap: f32,
    pub root_y: f32,
    pub padding: f32,
    /// Horizontal band handed to the root. `None` derives it from the tree.
    pub available_width: Option<f32>,
    /// Minimum gap kept between the narrowest sibling slots when deriving the band.
    pub sibling_gap: f32,
    /// Upper bound for the derived band; deep bushy trees stop widening here.
    pub max_width: f32,
    pub label_padding_x: f32,
    pub label_line_height: f32,
    pub group_stripe_width: f32,
    pub corner_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 180.0,
            card_height: 60.0,
            level_gap: 100.0,
            root_y: 80.0,
            padding: 40.0,
            available_width: None,
            sibling_gap: 20.0,
            max_width: 20_000.0,
            label_padding_x: 10.0,
            label_line_height: 1.4,
            group_stripe_width: 5.0,
            corner_radius: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Factor applied by a single zoom-in step; zoom-out uses its inverse.
    pub zoom_step: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { zoom_step: 1.2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            viewport: ViewportConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThemeVariables {
    font_family: Option<String>,
    name_font_size: Option<NumberOrString>,
    role_font_size: Option<NumberOrString>,
    card_fill: Option<String>,
    card_border: Option<String>,
    card_hover_fill: Option<String>,
    card_hover_border: Option<String>,
    card_selected_border: Option<String>,
    name_text_color: Option<String>,
    role_text_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
    group_palette: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LayoutConfigFile {
    card_width: Option<f32>,
    card_height: Option<f32>,
    level_gap: Option<f32>,
    root_y: Option<f32>,
    padding: Option<f32>,
    available_width: Option<f32>,
    sibling_gap: Option<f32>,
    max_width: Option<f32>,
    label_padding_x: Option<f32>,
    label_line_height: Option<f32>,
    group_stripe_width: Option<f32>,
    corner_radius: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ViewportConfigFile {
    zoom_step: Option<f32>,
}

/// On-disk shape of a config file or `%%{init}%%` directive. Every field is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    viewport: Option<ViewportConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(apply_config_file(config, parsed))
}

/// Overlays every field present in `file` onto `config`.
pub fn apply_config_file(mut config: Config, file: ConfigFile) -> Config {
    if let Some(theme_name) = file.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => {
                config.render.background = theme.background.clone();
                config.theme = theme;
            }
            None => tracing::warn!(theme = theme_name, "unknown theme name, keeping current"),
        }
    }

    if let Some(vars) = file.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.font_family {
            theme.font_family = v;
        }
        if let Some(v) = vars.name_font_size.as_ref().and_then(NumberOrString::as_f32) {
            theme.name_font_size = v;
        }
        if let Some(v) = vars.role_font_size.as_ref().and_then(NumberOrString::as_f32) {
            theme.role_font_size = v;
        }
        if let Some(v) = vars.card_fill {
            theme.card_fill = v;
        }
        if let Some(v) = vars.card_border {
            theme.card_border = v;
        }
        if let Some(v) = vars.card_hover_fill {
            theme.card_hover_fill = v;
        }
        if let Some(v) = vars.card_hover_border {
            theme.card_hover_border = v;
        }
        if let Some(v) = vars.card_selected_border {
            theme.card_selected_border = v;
        }
        if let Some(v) = vars.name_text_color {
            theme.name_text_color = v;
        }
        if let Some(v) = vars.role_text_color {
            theme.role_text_color = v;
        }
        if let Some(v) = vars.line_color {
            theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            theme.background = v;
        }
        if let Some(v) = vars.group_palette {
            theme.group_palette = v;
        }
    }

    if let Some(layout) = file.layout {
        let cfg = &mut config.layout;
        if let Some(v) = layout.card_width {
            cfg.card_width = v;
        }
        if let Some(v) = layout.card_height {
            cfg.card_height = v;
        }
        if let Some(v) = layout.level_gap {
            cfg.level_gap = v;
        }
        if let Some(v) = layout.root_y {
            cfg.root_y = v;
        }
        if let Some(v) = layout.padding {
            cfg.padding = v;
        }
        if let Some(v) = layout.available_width {
            cfg.available_width = Some(v);
        }
        if let Some(v) = layout.sibling_gap {
            cfg.sibling_gap = v;
        }
        if let Some(v) = layout.max_width {
            cfg.max_width = v;
        }
        if let Some(v) = layout.label_padding_x {
            cfg.label_padding_x = v;
        }
        if let Some(v) = layout.label_line_height {
            cfg.label_line_height = v;
        }
        if let Some(v) = layout.group_stripe_width {
            cfg.group_stripe_width = v;
        }
        if let Some(v) = layout.corner_radius {
            cfg.corner_radius = v;
        }
    }

    if let Some(viewport) = file.viewport
        && let Some(step) = viewport.zoom_step
    {
        if step.is_finite() && step > 0.0 {
            config.viewport.zoom_step = step;
        } else {
            tracing::warn!(step, "ignoring non-positive zoom step");
        }
    }

    config
}
