//! Theme: a nested design-token tree plus per-component style overrides.
//!
//! Tokens are addressed by dotted paths (`colors.border.primary`). Component
//! overrides live under `components.<Component>.<part>` and may be written as
//! tables or as declaration text:
//!
//! ```toml
//! name = "ocean"
//!
//! [colors.border]
//! primary = "#3b82f6"
//!
//! [components.StatusIndicator]
//! container = "border: round cyan; padding: 0 1"
//! ```
//!
//! A theme is read-only once built; widgets share it through `Rc<Theme>`.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::declaration::{parse_declarations, StyleParseError};
use super::record::StyleRecord;

/// Errors from loading a theme.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("invalid theme TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid theme JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid override for {component}.{part}: {source}")]
    Override {
        component: String,
        part: String,
        #[source]
        source: StyleParseError,
    },
}

// ---------------------------------------------------------------------------
// TokenNode
// ---------------------------------------------------------------------------

/// One node of the token tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TokenNode {
    Text(String),
    Number(f64),
    Group(BTreeMap<String, TokenNode>),
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A design-token tree with component override bag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Theme {
    name: String,
    tokens: BTreeMap<String, TokenNode>,
    components: BTreeMap<String, BTreeMap<String, StyleRecord>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OverrideSpec {
    Text(String),
    Record(StyleRecord),
}

#[derive(Deserialize)]
struct ThemeFile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    components: BTreeMap<String, BTreeMap<String, OverrideSpec>>,
    #[serde(flatten)]
    tokens: BTreeMap<String, TokenNode>,
}

impl Theme {
    /// Create an empty theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse a theme from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, ThemeError> {
        let file: ThemeFile = toml::from_str(input)?;
        Self::from_file(file)
    }

    /// Parse a theme from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, ThemeError> {
        let file: ThemeFile = serde_json::from_str(input)?;
        Self::from_file(file)
    }

    fn from_file(file: ThemeFile) -> Result<Self, ThemeError> {
        let mut components = BTreeMap::new();
        for (component, parts) in file.components {
            let mut resolved = BTreeMap::new();
            for (part, spec) in parts {
                let record = match spec {
                    OverrideSpec::Record(record) => record,
                    OverrideSpec::Text(text) => {
                        parse_declarations(&text).map_err(|source| ThemeError::Override {
                            component: component.clone(),
                            part: part.clone(),
                            source,
                        })?
                    }
                };
                resolved.insert(part, record);
            }
            components.insert(component, resolved);
        }
        Ok(Self {
            name: file.name,
            tokens: file.tokens,
            components,
        })
    }

    // ── Tokens ───────────────────────────────────────────────────────

    /// Set a token by dotted path (builder). Intermediate groups are created;
    /// a leaf standing in the way is replaced by a group.
    pub fn with_token(mut self, path: &str, value: impl Into<String>) -> Self {
        self.set_token(path, TokenNode::Text(value.into()));
        self
    }

    fn set_token(&mut self, path: &str, value: TokenNode) {
        let mut segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let Some(leaf) = segments.pop() else {
            return;
        };
        let mut map = &mut self.tokens;
        for segment in segments {
            let node = map
                .entry(segment.to_owned())
                .or_insert_with(|| TokenNode::Group(BTreeMap::new()));
            if !matches!(node, TokenNode::Group(_)) {
                *node = TokenNode::Group(BTreeMap::new());
            }
            map = match node {
                TokenNode::Group(inner) => inner,
                _ => return,
            };
        }
        map.insert(leaf.to_owned(), value);
    }

    /// Look up a token node by dotted path.
    pub fn node(&self, path: &str) -> Option<&TokenNode> {
        let mut segments = path.split('.');
        let mut node = self.tokens.get(segments.next()?)?;
        for segment in segments {
            node = match node {
                TokenNode::Group(map) => map.get(segment)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Look up a text token by dotted path.
    pub fn token(&self, path: &str) -> Option<&str> {
        match self.node(path)? {
            TokenNode::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a numeric token by dotted path.
    pub fn number(&self, path: &str) -> Option<f64> {
        match self.node(path)? {
            TokenNode::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// `colors.<path>`, falling back to `fallback` when unset.
    pub fn color(&self, path: &str, fallback: &str) -> String {
        self.token(&format!("colors.{path}"))
            .unwrap_or(fallback)
            .to_owned()
    }

    // ── Component overrides ──────────────────────────────────────────

    /// Set the override record for `component.part` (builder).
    pub fn with_override(
        mut self,
        component: impl Into<String>,
        part: impl Into<String>,
        record: StyleRecord,
    ) -> Self {
        self.components
            .entry(component.into())
            .or_default()
            .insert(part.into(), record);
        self
    }

    /// The override record for `component.part`, if any.
    pub fn component_override(&self, component: &str, part: &str) -> Option<&StyleRecord> {
        self.components.get(component)?.get(part)
    }

    // ── Built-in themes ──────────────────────────────────────────────

    /// Default dark-terminal theme.
    pub fn dark() -> Self {
        Self::new("dark")
            .with_token("colors.text.primary", "white")
            .with_token("colors.text.muted", "grey")
            .with_token("colors.text.inverse", "black")
            .with_token("colors.border.primary", "blue")
            .with_token("colors.border.muted", "dark_grey")
            .with_token("colors.border.focus", "cyan")
            .with_token("colors.accent.primary", "blue")
            .with_token("colors.accent.secondary", "magenta")
            .with_token("colors.status.idle", "grey")
            .with_token("colors.status.running", "green")
            .with_token("colors.status.paused", "yellow")
            .with_token("colors.status.error", "red")
            .with_token("colors.status.completed", "cyan")
            .with_token("colors.status.stopped", "dark_grey")
            .with_token("colors.level.debug", "dark_grey")
            .with_token("colors.level.info", "white")
            .with_token("colors.level.warn", "yellow")
            .with_token("colors.level.error", "red")
            .with_token("colors.selection.fg", "black")
            .with_token("colors.selection.bg", "cyan")
    }

    /// Light-terminal theme.
    pub fn light() -> Self {
        Self::dark()
            .renamed("light")
            .with_token("colors.text.primary", "black")
            .with_token("colors.text.muted", "dark_grey")
            .with_token("colors.text.inverse", "white")
            .with_token("colors.border.muted", "grey")
            .with_token("colors.status.running", "dark_green")
            .with_token("colors.status.paused", "dark_yellow")
            .with_token("colors.level.info", "black")
            .with_token("colors.level.warn", "dark_yellow")
            .with_token("colors.selection.fg", "white")
            .with_token("colors.selection.bg", "dark_blue")
    }

    fn renamed(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
