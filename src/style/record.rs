//! Style records: typed `Option<T>` fields for every style key.
//!
//! A [`StyleRecord`] is both a partial layer (only some keys set) and, after the
//! cascade, a [`ResolvedStyle`]. `None` means "not set by this layer".

use serde::Deserialize;

/// Text alignment inside an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Border glyph family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    None,
    Thin,
    Heavy,
    Double,
    Round,
    Ascii,
}

impl BorderKind {
    /// Parse a border kind name (`"line"` is accepted for `thin`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "thin" | "line" | "solid" => Some(Self::Thin),
            "heavy" | "bold" => Some(Self::Heavy),
            "double" => Some(Self::Double),
            "round" | "rounded" => Some(Self::Round),
            "ascii" => Some(Self::Ascii),
            _ => None,
        }
    }

    /// Whether this kind occupies cells.
    pub fn is_visible(self) -> bool {
        self != Self::None
    }
}

/// A border with kind and optional color.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Border {
    pub kind: BorderKind,
    #[serde(default)]
    pub color: Option<String>,
}

impl Border {
    pub fn new(kind: BorderKind) -> Self {
        Self { kind, color: None }
    }

    pub fn colored(kind: BorderKind, color: impl Into<String>) -> Self {
        Self {
            kind,
            color: Some(color.into()),
        }
    }
}

/// Inner spacing in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Padding {
    pub fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(v: u16) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn symmetric(vertical: u16, horizontal: u16) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn horizontal(&self) -> u16 {
        self.left + self.right
    }

    pub fn vertical(&self) -> u16 {
        self.top + self.bottom
    }
}

/// Every style key an element can carry. Each field is `Option<T>`; `None`
/// means unset.
///
/// `border` and `padding` are structural: a layer that sets them replaces the
/// whole value, never individual sides or attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleRecord {
    // Colors
    pub fg: Option<String>,
    pub bg: Option<String>,

    // Text attributes
    pub bold: Option<bool>,
    pub dim: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub inverse: Option<bool>,
    pub align: Option<TextAlign>,

    /// Glyph prefixed to the element's content (status dots, markers).
    pub symbol: Option<String>,

    // Structure
    pub border: Option<Border>,
    pub padding: Option<Padding>,

    // Placement (absolute, in cells, relative to the parent's inner area)
    pub top: Option<u16>,
    pub left: Option<u16>,
    pub width: Option<u16>,
    pub height: Option<u16>,
}

/// The fully merged record produced by the cascade.
pub type ResolvedStyle = StyleRecord;

impl StyleRecord {
    /// Create a new record with every key unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `other` on top of `self`: every key `other` sets wins, every key
    /// it leaves unset keeps `self`'s value.
    pub fn merge(&self, other: &StyleRecord) -> StyleRecord {
        fn pick<T: Clone>(base: &Option<T>, other: &Option<T>) -> Option<T> {
            if other.is_some() {
                other.clone()
            } else {
                base.clone()
            }
        }

        StyleRecord {
            fg: pick(&self.fg, &other.fg),
            bg: pick(&self.bg, &other.bg),

            bold: pick(&self.bold, &other.bold),
            dim: pick(&self.dim, &other.dim),
            italic: pick(&self.italic, &other.italic),
            underline: pick(&self.underline, &other.underline),
            inverse: pick(&self.inverse, &other.inverse),
            align: pick(&self.align, &other.align),

            symbol: pick(&self.symbol, &other.symbol),

            border: pick(&self.border, &other.border),
            padding: pick(&self.padding, &other.padding),

            top: pick(&self.top, &other.top),
            left: pick(&self.left, &other.left),
            width: pick(&self.width, &other.width),
            height: pick(&self.height, &other.height),
        }
    }

    /// Returns `true` if no key is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn fg(mut self, color: impl Into<String>) -> Self {
        self.fg = Some(color.into());
        self
    }

    pub fn bg(mut self, color: impl Into<String>) -> Self {
        self.bg = Some(color.into());
        self
    }

    pub fn bold(mut self, on: bool) -> Self {
        self.bold = Some(on);
        self
    }

    pub fn dim(mut self, on: bool) -> Self {
        self.dim = Some(on);
        self
    }

    pub fn italic(mut self, on: bool) -> Self {
        self.italic = Some(on);
        self
    }

    pub fn underline(mut self, on: bool) -> Self {
        self.underline = Some(on);
        self
    }

    pub fn inverse(mut self, on: bool) -> Self {
        self.inverse = Some(on);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    pub fn at(mut self, top: u16, left: u16) -> Self {
        self.top = Some(top);
        self.left = Some(left);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        assert!(StyleRecord::new().is_empty());
        assert!(!StyleRecord::new().fg("red").is_empty());
    }

    #[test]
    fn merge_keeps_base_when_other_empty() {
        let base = StyleRecord::new().fg("red").bold(true);
        let merged = base.merge(&StyleRecord::new());
        assert_eq!(merged, base);
    }

    #[test]
    fn merge_other_overrides_base() {
        let base = StyleRecord::new().fg("red").bg("white");
        let other = StyleRecord::new().fg("blue");
        let merged = base.merge(&other);
        assert_eq!(merged.fg.as_deref(), Some("blue"));
        assert_eq!(merged.bg.as_deref(), Some("white"));
    }

    #[test]
    fn merge_replaces_padding_wholesale() {
        let base = StyleRecord::new().padding(Padding::new(1, 2, 3, 4));
        let other = StyleRecord::new().padding(Padding::symmetric(0, 1));
        let merged = base.merge(&other);
        // No per-side merge: top/bottom come from `other` even though they are zero.
        assert_eq!(merged.padding, Some(Padding::new(0, 1, 0, 1)));
    }

    #[test]
    fn merge_replaces_border_wholesale() {
        let base = StyleRecord::new().border(Border::colored(BorderKind::Thin, "blue"));
        let other = StyleRecord::new().border(Border::new(BorderKind::Heavy));
        let merged = base.merge(&other);
        // Color is not inherited from the earlier border.
        assert_eq!(merged.border, Some(Border::new(BorderKind::Heavy)));
    }

    #[test]
    fn merge_is_not_commutative() {
        let a = StyleRecord::new().fg("red");
        let b = StyleRecord::new().fg("blue");
        assert_eq!(a.merge(&b).fg.as_deref(), Some("blue"));
        assert_eq!(b.merge(&a).fg.as_deref(), Some("red"));
    }

    #[test]
    fn border_kind_names() {
        assert_eq!(BorderKind::from_name("line"), Some(BorderKind::Thin));
        assert_eq!(BorderKind::from_name("ROUND"), Some(BorderKind::Round));
        assert_eq!(BorderKind::from_name("zigzag"), None);
        assert!(!BorderKind::None.is_visible());
    }

    #[test]
    fn deserialize_from_toml_table() {
        let record: StyleRecord = toml::from_str(
            r#"
            fg = "cyan"
            bold = true
            align = "center"
            padding = { left = 1, right = 1 }
            border = { kind = "round", color = "blue" }
            "#,
        )
        .unwrap();
        assert_eq!(record.fg.as_deref(), Some("cyan"));
        assert_eq!(record.bold, Some(true));
        assert_eq!(record.align, Some(TextAlign::Center));
        assert_eq!(record.padding, Some(Padding::new(0, 1, 0, 1)));
        assert_eq!(record.border, Some(Border::colored(BorderKind::Round, "blue")));
    }

    #[test]
    fn deserialize_rejects_unknown_keys() {
        let result: Result<StyleRecord, _> = toml::from_str("colour = \"red\"");
        assert!(result.is_err());
    }
}
