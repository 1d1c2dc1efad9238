use serde::{Deserialize, Serialize};

const CLASSIC_GROUP_PALETTE: [&str; 8] = [
    "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1", "#FF9DA7",
];

const MODERN_GROUP_PALETTE: [&str; 8] = [
    "#6366F1", "#0EA5E9", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub name_font_size: f32,
    pub role_font_size: f32,
    pub card_fill: String,
    pub card_border: String,
    pub card_hover_fill: String,
    pub card_hover_border: String,
    pub card_selected_border: String,
    pub name_text_color: String,
    pub role_text_color: String,
    pub line_color: String,
    pub background: String,
    pub group_palette: Vec<String>,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            name_font_size: 14.0,
            role_font_size: 12.0,
            card_fill: "#F5F5FF".to_string(),
            card_border: "#B8B8D0".to_string(),
            card_hover_fill: "#DCDCF5".to_string(),
            card_hover_border: "#5A4FCF".to_string(),
            card_selected_border: "#E15759".to_string(),
            name_text_color: "#222222".to_string(),
            role_text_color: "#555555".to_string(),
            line_color: "#888888".to_string(),
            background: "#FFFFFF".to_string(),
            group_palette: CLASSIC_GROUP_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            name_font_size: 13.0,
            role_font_size: 11.0,
            card_fill: "#F8FAFF".to_string(),
            card_border: "#C7D2E5".to_string(),
            card_hover_fill: "#E3EAF7".to_string(),
            card_hover_border: "#3B5BDB".to_string(),
            card_selected_border: "#F59F00".to_string(),
            name_text_color: "#1C2430".to_string(),
            role_text_color: "#5B6B84".to_string(),
            line_color: "#7A8AA6".to_string(),
            background: "#FFFFFF".to_string(),
            group_palette: MODERN_GROUP_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }

    /// Palette color for the `index`-th distinct group, cycling when exhausted.
    pub fn group_color(&self, index: usize) -> Option<&str> {
        if self.group_palette.is_empty() {
            return None;
        }
        Some(self.group_palette[index % self.group_palette.len()].as_str())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
