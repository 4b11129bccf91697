//! Style engine: records, declaration text, themes, cascade resolution.

pub mod cascade;
pub mod declaration;
pub mod record;
pub mod theme;
pub mod tokenizer;

pub use cascade::{apply_in_order, resolve_style, Axes, Axis, LayerFn, PartTable, StyleLayer, DEFAULT_KEY};
pub use declaration::{parse_declarations, StyleParseError};
pub use record::{Border, BorderKind, Padding, ResolvedStyle, StyleRecord, TextAlign};
pub use theme::{Theme, ThemeError, TokenNode};
