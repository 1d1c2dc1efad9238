use crate::config::ConfigFile;
use crate::ir::{OrgChart, OrgNode};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^orgchart\b\s*$").unwrap());
static INIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^%%\{\s*init\s*:\s*(\{.*\})\s*\}%%$").unwrap());
static NODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?P<id>[A-Za-z0-9_.\-]+)\s*(?:\[\s*"(?P<name>[^"]*)"\s*\])?\s*(?::\s*(?P<role>[^@<]*?))?\s*(?:@(?P<group>[^<]+?))?\s*(?:<\s*(?P<parent>[A-Za-z0-9_.\-]+))?$"#,
    )
    .unwrap()
});

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON input: {0}")]
    Json(String),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub chart: OrgChart,
    pub init_config: Option<ConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Records(Vec<OrgNode>),
    Document {
        nodes: Vec<OrgNode>,
        #[serde(default)]
        config: Option<ConfigFile>,
    },
}

/// Parses either a JSON(5) record list or the line-oriented text form.
pub fn parse_orgchart(input: &str) -> Result<ParseOutput, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_json(trimmed)
    } else {
        parse_text(input)
    }
}

pub fn parse_json(input: &str) -> Result<ParseOutput, ParseError> {
    let parsed: JsonInput =
        json5::from_str(input).map_err(|err| ParseError::Json(err.to_string()))?;
    let (nodes, init_config) = match parsed {
        JsonInput::Records(nodes) => (nodes, None),
        JsonInput::Document { nodes, config } => (nodes, config),
    };
    let nodes = nodes.into_iter().map(normalize_node).collect();
    Ok(ParseOutput {
        chart: OrgChart::from_nodes(nodes),
        init_config,
    })
}

/// A blank name falls back to the id. `parentId` is kept verbatim: only
/// null or absent marks the root.
fn normalize_node(mut node: OrgNode) -> OrgNode {
    if node.display_name.trim().is_empty() {
        node.display_name = node.id.clone();
    }
    node
}

pub fn parse_text(input: &str) -> Result<ParseOutput, ParseError> {
    let mut output = ParseOutput::default();
    let mut seen_content = false;

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = INIT_RE.captures(line) {
            let config = json5::from_str::<ConfigFile>(&caps[1]).map_err(|err| {
                ParseError::Syntax {
                    line: line_no,
                    message: format!("invalid init directive: {err}"),
                }
            })?;
            output.init_config = Some(config);
            continue;
        }
        let line = strip_trailing_comment(line);
        if line.is_empty() {
            continue;
        }
        if !seen_content && HEADER_RE.is_match(line) {
            seen_content = true;
            continue;
        }
        seen_content = true;

        let Some(caps) = NODE_RE.captures(line) else {
            return Err(ParseError::Syntax {
                line: line_no,
                message: format!("expected `id[\"name\"]: role @group < parent`, got `{line}`"),
            });
        };
        let id = &caps["id"];
        let text = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        };
        let display_name = match text("name") {
            name if name.is_empty() => id.to_string(),
            name => name,
        };
        output.chart.push(OrgNode {
            id: id.to_string(),
            display_name,
            role_title: text("role"),
            group_label: text("group"),
            parent_id: caps.name("parent").map(|m| m.as_str().to_string()),
        });
    }

    tracing::debug!(nodes = output.chart.len(), "parsed org chart text");
    Ok(output)
}

fn strip_trailing_comment(line: &str) -> &str {
    if line.starts_with("%%") {
        return "";
    }
    match line.find(" %%") {
        Some(idx) => line[..idx].trim_end(),
        None => line,
    }
}
