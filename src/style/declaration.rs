//! Declaration parser: text → [`StyleRecord`].
//!
//! Used for theme component overrides and caller-supplied custom styles.
//! Grammar: `decl (';' decl)* ';'?` where `decl` is `key` or `key ':' value+`.
//! A bare key is shorthand for `key: true` and only valid for flags.

use super::record::{Border, BorderKind, Padding, StyleRecord, TextAlign};
use super::tokenizer::{tokenize, Spanned, Token};

/// Errors from declaration parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleParseError {
    #[error("unexpected input at byte {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unknown style key: {0}")]
    UnknownProperty(String),
    #[error("invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },
}

impl std::str::FromStr for StyleRecord {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_declarations(s)
    }
}

/// Parse declaration text into a partial style record.
pub fn parse_declarations(input: &str) -> Result<StyleRecord, StyleParseError> {
    let tokens = tokenize(input).map_err(|position| StyleParseError::UnexpectedToken {
        position,
        message: "unrecognized character".into(),
    })?;

    let mut record = StyleRecord::new();
    for decl in tokens.split(|t| t.token == Token::Semicolon) {
        if decl.is_empty() {
            continue;
        }
        let key = &decl[0];
        if key.token != Token::Ident {
            return Err(StyleParseError::UnexpectedToken {
                position: key.offset,
                message: format!("expected a style key, found `{}`", key.text),
            });
        }
        let values = match decl.get(1) {
            None => &decl[1..],
            Some(colon) if colon.token == Token::Colon => &decl[2..],
            Some(other) => {
                return Err(StyleParseError::UnexpectedToken {
                    position: other.offset,
                    message: format!("expected `:` after `{}`", key.text),
                })
            }
        };
        apply_declaration(&mut record, &key.text, values)?;
    }
    Ok(record)
}

/// Apply one `key: values` declaration to `record`.
fn apply_declaration(
    record: &mut StyleRecord,
    key: &str,
    values: &[Spanned],
) -> Result<(), StyleParseError> {
    let property = key.to_ascii_lowercase();
    let invalid = |message: String| StyleParseError::InvalidValue {
        property: property.clone(),
        message,
    };

    match property.as_str() {
        "fg" | "color" => record.fg = Some(single_text(values).map_err(invalid)?),
        "bg" | "background" => record.bg = Some(single_text(values).map_err(invalid)?),
        "bold" => record.bold = Some(flag(values).map_err(invalid)?),
        "dim" => record.dim = Some(flag(values).map_err(invalid)?),
        "italic" => record.italic = Some(flag(values).map_err(invalid)?),
        "underline" => record.underline = Some(flag(values).map_err(invalid)?),
        "inverse" | "reverse" => record.inverse = Some(flag(values).map_err(invalid)?),
        "align" | "text-align" => {
            let name = single_text(values).map_err(invalid)?;
            record.align = Some(match name.as_str() {
                "left" => TextAlign::Left,
                "center" => TextAlign::Center,
                "right" => TextAlign::Right,
                other => return Err(invalid(format!("unknown alignment `{other}`"))),
            });
        }
        "symbol" => record.symbol = Some(single_text(values).map_err(invalid)?),
        "border" => record.border = Some(parse_border(values).map_err(invalid)?),
        "padding" => record.padding = Some(parse_padding(values).map_err(invalid)?),
        "top" => record.top = Some(single_number(values).map_err(invalid)?),
        "left" => record.left = Some(single_number(values).map_err(invalid)?),
        "width" => record.width = Some(single_number(values).map_err(invalid)?),
        "height" => record.height = Some(single_number(values).map_err(invalid)?),
        _ => return Err(StyleParseError::UnknownProperty(key.to_owned())),
    }
    Ok(())
}

/// Text of a token, with string quotes removed.
fn text_of(token: &Spanned) -> String {
    match token.token {
        Token::StringLiteral => token.text.trim_matches('"').to_owned(),
        _ => token.text.clone(),
    }
}

fn single_text(values: &[Spanned]) -> Result<String, String> {
    match values {
        [one] if one.token != Token::Colon => Ok(text_of(one)),
        [] => Err("expected a value".into()),
        _ => Err(format!("expected one value, got {}", values.len())),
    }
}

fn single_number(values: &[Spanned]) -> Result<u16, String> {
    match values {
        [one] if one.token == Token::Number => one
            .text
            .parse::<u16>()
            .map_err(|e| format!("`{}`: {e}", one.text)),
        [one] => Err(format!("expected a number, got `{}`", one.text)),
        _ => Err(format!("expected one number, got {} values", values.len())),
    }
}

fn flag(values: &[Spanned]) -> Result<bool, String> {
    if values.is_empty() {
        return Ok(true);
    }
    match single_text(values)?.as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected true/false, got `{other}`")),
    }
}

/// `border: <kind> [color]`.
fn parse_border(values: &[Spanned]) -> Result<Border, String> {
    let (kind, rest) = values.split_first().ok_or("expected a border kind")?;
    let kind =
        BorderKind::from_name(&kind.text).ok_or_else(|| format!("unknown border `{}`", kind.text))?;
    match rest {
        [] => Ok(Border::new(kind)),
        [color] => Ok(Border::colored(kind, text_of(color))),
        _ => Err("expected `<kind> [color]`".into()),
    }
}

/// CSS-style 1–4 value shorthand.
fn parse_padding(values: &[Spanned]) -> Result<Padding, String> {
    let nums = values
        .iter()
        .map(|v| single_number(std::slice::from_ref(v)))
        .collect::<Result<Vec<u16>, String>>()?;
    match nums.as_slice() {
        [all] => Ok(Padding::all(*all)),
        [v, h] => Ok(Padding::symmetric(*v, *h)),
        [t, h, b] => Ok(Padding::new(*t, *h, *b, *h)),
        [t, r, b, l] => Ok(Padding::new(*t, *r, *b, *l)),
        _ => Err(format!("expected 1-4 values, got {}", nums.len())),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
