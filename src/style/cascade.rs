//! Style cascade: axis selection → ordered layers → one resolved record.
//!
//! Every widget part (container, header, status chip, …) declares a
//! [`PartTable`]: a base layer plus, per [`Axis`], a map from axis value to a
//! layer producer. Resolution collects the layers selected by an [`Axes`]
//! record and folds them through [`apply_in_order`], the single reducer that
//! enforces precedence:
//!
//! ```text
//! base < theme override < variant < size < layout < state < status < override < custom
//! ```
//!
//! Resolution is a pure function of `(theme, table, axes)`.

use std::collections::BTreeMap;

use super::record::{ResolvedStyle, StyleRecord};
use super::theme::Theme;

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// A cascade position. Declaration order is precedence order: later axes win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// The part's own base layer.
    Base,
    /// `theme.components.<Component>.<part>`.
    Theme,
    Variant,
    Size,
    /// Layout or display mode (`compact`, `detailed`, …).
    Layout,
    /// Interaction state (`focused`, `hover`, …).
    State,
    /// Domain status (`running`, `error`, …).
    Status,
    /// Selected / disabled overrides.
    Override,
    /// Ad-hoc caller overrides.
    Custom,
}

impl Axis {
    /// Axes whose layer is picked by a value in [`Axes`].
    pub const SELECTABLE: [Axis; 6] = [
        Axis::Variant,
        Axis::Size,
        Axis::Layout,
        Axis::State,
        Axis::Status,
        Axis::Override,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Theme => "theme",
            Self::Variant => "variant",
            Self::Size => "size",
            Self::Layout => "layout",
            Self::State => "state",
            Self::Status => "status",
            Self::Override => "override",
            Self::Custom => "custom",
        }
    }
}

/// Key of the layer used when an axis value has no entry.
pub const DEFAULT_KEY: &str = "default";

// ---------------------------------------------------------------------------
// StyleLayer
// ---------------------------------------------------------------------------

/// A partial style record tagged with its cascade position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleLayer {
    pub axis: Axis,
    /// The axis value that selected this layer (e.g. `"primary"`).
    pub key: String,
    pub style: StyleRecord,
}

impl StyleLayer {
    pub fn new(axis: Axis, key: impl Into<String>, style: StyleRecord) -> Self {
        Self {
            axis,
            key: key.into(),
            style,
        }
    }
}

/// Merge layers in cascade order.
///
/// Layers are stably sorted by axis, so the result does not depend on the
/// order they are passed in; two layers on the same axis apply in slice order.
pub fn apply_in_order(layers: &[StyleLayer]) -> ResolvedStyle {
    let mut ordered: Vec<&StyleLayer> = layers.iter().collect();
    ordered.sort_by_key(|layer| layer.axis);
    ordered
        .into_iter()
        .fold(StyleRecord::new(), |acc, layer| acc.merge(&layer.style))
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Axis values selected for one resolution. Absent values skip their layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Axes {
    pub variant: Option<String>,
    pub size: Option<String>,
    pub layout: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub overrides: Option<String>,
    pub custom: Option<StyleRecord>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variant(mut self, value: impl Into<String>) -> Self {
        self.variant = Some(value.into());
        self
    }

    pub fn size(mut self, value: impl Into<String>) -> Self {
        self.size = Some(value.into());
        self
    }

    pub fn layout(mut self, value: impl Into<String>) -> Self {
        self.layout = Some(value.into());
        self
    }

    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into());
        self
    }

    pub fn status(mut self, value: impl Into<String>) -> Self {
        self.status = Some(value.into());
        self
    }

    /// Select the `selected` / `disabled` override layer.
    pub fn overrides(mut self, value: impl Into<String>) -> Self {
        self.overrides = Some(value.into());
        self
    }

    pub fn custom(mut self, style: StyleRecord) -> Self {
        self.custom = Some(style);
        self
    }

    /// Set an axis from an optional value (builder), for values read from props.
    pub fn with(mut self, axis: Axis, value: Option<&str>) -> Self {
        let value = value.map(str::to_owned);
        match axis {
            Axis::Variant => self.variant = value,
            Axis::Size => self.size = value,
            Axis::Layout => self.layout = value,
            Axis::State => self.state = value,
            Axis::Status => self.status = value,
            Axis::Override => self.overrides = value,
            Axis::Base | Axis::Theme | Axis::Custom => {}
        }
        self
    }

    /// The selected value for a selectable axis.
    pub fn get(&self, axis: Axis) -> Option<&str> {
        match axis {
            Axis::Variant => self.variant.as_deref(),
            Axis::Size => self.size.as_deref(),
            Axis::Layout => self.layout.as_deref(),
            Axis::State => self.state.as_deref(),
            Axis::Status => self.status.as_deref(),
            Axis::Override => self.overrides.as_deref(),
            Axis::Base | Axis::Theme | Axis::Custom => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PartTable
// ---------------------------------------------------------------------------

/// A layer producer: a pure function of the theme.
pub type LayerFn = fn(&Theme) -> StyleRecord;

/// The layer table for one widget part.
#[derive(Debug, Clone)]
pub struct PartTable {
    component: &'static str,
    part: &'static str,
    base: Option<LayerFn>,
    axes: BTreeMap<Axis, BTreeMap<&'static str, LayerFn>>,
}

impl PartTable {
    pub fn new(component: &'static str, part: &'static str) -> Self {
        Self {
            component,
            part,
            base: None,
            axes: BTreeMap::new(),
        }
    }

    /// Set the base layer (builder).
    pub fn base(mut self, layer: LayerFn) -> Self {
        self.base = Some(layer);
        self
    }

    /// Register the layer for `axis = key` (builder).
    ///
    /// Only [`Axis::SELECTABLE`] axes are consulted during resolution; use
    /// [`base`](Self::base) for the base layer.
    pub fn layer(mut self, axis: Axis, key: &'static str, layer: LayerFn) -> Self {
        self.axes.entry(axis).or_default().insert(key, layer);
        self
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn part(&self) -> &'static str {
        self.part
    }

    /// Collect the layers selected by `axes`, in cascade order.
    ///
    /// An axis value with no entry falls back to the axis's `default` layer,
    /// or is skipped when the axis has none.
    pub fn layers(&self, theme: &Theme, axes: &Axes) -> Vec<StyleLayer> {
        let mut layers = Vec::new();

        if let Some(base) = self.base {
            layers.push(StyleLayer::new(Axis::Base, Axis::Base.name(), base(theme)));
        }
        if let Some(record) = theme.component_override(self.component, self.part) {
            layers.push(StyleLayer::new(Axis::Theme, theme.name(), record.clone()));
        }

        for axis in Axis::SELECTABLE {
            let Some(value) = axes.get(axis) else {
                continue;
            };
            let Some(table) = self.axes.get(&axis) else {
                continue;
            };
            let selected = match table.get(value) {
                Some(layer) => Some((value, layer)),
                None => {
                    tracing::debug!(
                        component = self.component,
                        part = self.part,
                        axis = axis.name(),
                        value,
                        "unknown axis value, using default layer"
                    );
                    table.get(DEFAULT_KEY).map(|layer| (DEFAULT_KEY, layer))
                }
            };
            if let Some((key, layer)) = selected {
                layers.push(StyleLayer::new(axis, key, layer(theme)));
            }
        }

        if let Some(custom) = &axes.custom {
            layers.push(StyleLayer::new(Axis::Custom, Axis::Custom.name(), custom.clone()));
        }

        layers
    }
}

/// Resolve the style of one part for the given axis selection.
pub fn resolve_style(theme: &Theme, table: &PartTable, axes: &Axes) -> ResolvedStyle {
    apply_in_order(&table.layers(theme, axes))
}

// ===========================================================================
// Tests
// ===========================================================================
