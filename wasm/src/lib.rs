use orgchart_renderer::{InteractionState, RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgChartRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    card_width: Option<f32>,
    card_height: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    selected: Option<String>,
    hovered: Option<String>,
    #[serde(default)]
    zoom: Vec<f32>,
}

fn build_render_options(options: OrgChartRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("classic") {
        RenderOptions::classic()
    } else {
        RenderOptions::modern()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        let theme = &mut render_options.theme;
        theme.role_font_size = font_size * theme.role_font_size / theme.name_font_size;
        theme.name_font_size = font_size;
    }
    if let Some(card_width) = options.card_width {
        render_options.layout.card_width = card_width;
    }
    if let Some(card_height) = options.card_height {
        render_options.layout.card_height = card_height;
    }
    if let Some(width) = options.width {
        render_options.render.width = width;
    }
    if let Some(height) = options.height {
        render_options.render.height = height;
    }
    render_options.interaction = InteractionState {
        hovered: options.hovered,
        selected: options.selected,
    };
    render_options.zoom = options.zoom;

    render_options
}

#[wasm_bindgen]
pub fn render_orgchart_svg(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<OrgChartRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        OrgChartRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(code, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use orgchart_renderer::render_with_options;

    use crate::{OrgChartRenderOptions, build_render_options};

    #[test]
    fn renders_records_with_selection() {
        let code = r#"[
            { "id": "ceo", "displayName": "Ada", "roleTitle": "CEO" },
            { "id": "cto", "displayName": "Grace", "roleTitle": "CTO", "parentId": "ceo" }
        ]"#;
        let options: OrgChartRenderOptions =
            serde_json::from_str(r#"{ "selected": "cto", "cardWidth": 220, "zoom": [1.5] }"#)
                .expect("options should parse");

        let svg = render_with_options(code, build_render_options(options))
            .expect("org chart should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Grace"));
        assert!(svg.contains("org-node selected\" data-id=\"cto\""));
        assert!(svg.contains("width=\"220.00\""));
    }

    #[test]
    fn font_size_keeps_role_ratio() {
        let options = build_render_options(OrgChartRenderOptions {
            font_size: Some(26.0),
            ..Default::default()
        });
        assert_eq!(options.theme.name_font_size, 26.0);
        assert_eq!(options.theme.role_font_size, 22.0);
    }
}
