use crate::config::{LayoutConfig, RenderConfig};
use crate::scene::{Card, CardState, Scene};
use crate::theme::Theme;
use crate::viewport::Viewport;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(scene: &Scene, viewport: &Viewport, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = viewport.width.max(1.0);
    let height = viewport.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{}\">",
        viewport.view_box()
    ));

    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
        viewport.origin_x,
        viewport.origin_y,
        viewport.scale_width,
        viewport.scale_height,
        escape_xml(&theme.background)
    ));

    svg.push_str("<g class=\"edges\">");
    for edge in &scene.edges {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\" data-from=\"{}\" data-to=\"{}\"/>",
            edge.to_svg_path(),
            escape_xml(&theme.line_color),
            escape_xml(&edge.from),
            escape_xml(&edge.to)
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for card in &scene.cards {
        svg.push_str(&card_svg(card, theme, config));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn card_svg(card: &Card, theme: &Theme, config: &LayoutConfig) -> String {
    let (fill, stroke, stroke_width) = match card.state {
        CardState::Default => (theme.card_fill.as_str(), theme.card_border.as_str(), 1.2),
        CardState::Hovered => (theme.card_hover_fill.as_str(), theme.card_hover_border.as_str(), 2.0),
        CardState::Selected => (theme.card_hover_fill.as_str(), theme.card_selected_border.as_str(), 2.5),
    };
    let state = match card.state {
        CardState::Default => "default",
        CardState::Hovered => "hovered",
        CardState::Selected => "selected",
    };

    let fill = escape_xml(fill);
    let stroke = escape_xml(stroke);

    let mut out = String::new();
    out.push_str(&format!(
        "<g class=\"org-node {state}\" data-id=\"{}\">",
        escape_xml(&card.id)
    ));
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r:.2}\" ry=\"{r:.2}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"{stroke_width}\"/>",
        card.x,
        card.y,
        card.width,
        card.height,
        r = config.corner_radius,
    ));
    if let Some(color) = &card.group_color {
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
            card.x,
            card.y + config.corner_radius / 2.0,
            config.group_stripe_width,
            (card.height - config.corner_radius).max(0.0),
            escape_xml(color)
        ));
    }

    let center_x = card.center_x();
    let center_y = card.y + card.height / 2.0;
    if card.role.is_empty() {
        out.push_str(&text_svg(
            center_x,
            center_y + theme.name_font_size * 0.35,
            &card.name,
            theme.name_font_size,
            &theme.name_text_color,
            &theme.font_family,
            "600",
        ));
    } else {
        let role_gap = theme.role_font_size * config.label_line_height;
        let total = theme.name_font_size + role_gap;
        let name_y = center_y - total / 2.0 + theme.name_font_size;
        out.push_str(&text_svg(
            center_x,
            name_y,
            &card.name,
            theme.name_font_size,
            &theme.name_text_color,
            &theme.font_family,
            "600",
        ));
        out.push_str(&text_svg(
            center_x,
            name_y + role_gap,
            &card.role,
            theme.role_font_size,
            &theme.role_text_color,
            &theme.font_family,
            "normal",
        ));
    }
    out.push_str("</g>");
    out
}

fn text_svg(x: f32, y: f32, text: &str, size: f32, fill: &str, family: &str, weight: &str) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{size}\" font-weight=\"{weight}\" fill=\"{}\">{}</text>",
        escape_xml(family),
        escape_xml(fill),
        escape_xml(text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme
        .font_family
        .split(',')
        .map(|part| part.trim().trim_matches('"').trim_matches('\''))
        .find(|part| !part.is_empty())
    {
        opt.font_family = family.to_string();
    }
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
