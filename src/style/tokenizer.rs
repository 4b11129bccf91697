//! logos-based tokenizer for style declaration text.
//!
//! Declaration text is a `;`-separated list of `key: value` pairs such as
//! `fg: cyan; bold; border: round #3b82f6; padding: 0 1`.
//!
//! Longest match wins, so `#3b82f6` lexes as [`Token::HexColor`] and
//! `dark-grey` as a single [`Token::Ident`].

use logos::Logos;

/// Token produced by the declaration lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Hex color: `#fff`, `#3b82f6`.
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Non-negative integer.
    #[regex(r"[0-9]+")]
    Number,

    /// Identifier: property names, color names, keywords.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,
}

/// A token with its source text and byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub text: String,
    pub offset: usize,
}

/// Tokenize declaration text.
///
/// Returns the byte offset of the first unlexable character as the error.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, usize> {
    Token::lexer(input)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok(Spanned {
                token,
                text: input[span.clone()].to_owned(),
                offset: span.start,
            }),
            Err(()) => Err(span.start),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn simple_declaration() {
        assert_eq!(
            tokens("fg: cyan;"),
            vec![Token::Ident, Token::Colon, Token::Ident, Token::Semicolon]
        );
    }

    #[test]
    fn hex_color_beats_ident() {
        let toks = tokenize("#3b82f6").unwrap();
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].token, Token::HexColor);
        assert_eq!(toks[0].text, "#3b82f6");
    }

    #[test]
    fn hyphenated_ident() {
        let toks = tokenize("dark-grey").unwrap();
        assert_eq!(toks[0].token, Token::Ident);
        assert_eq!(toks[0].text, "dark-grey");
    }

    #[test]
    fn numbers_and_strings() {
        assert_eq!(
            tokens(r#"padding: 0 1; symbol: "●""#),
            vec![
                Token::Ident,
                Token::Colon,
                Token::Number,
                Token::Number,
                Token::Semicolon,
                Token::Ident,
                Token::Colon,
                Token::StringLiteral,
            ]
        );
    }

    #[test]
    fn offsets_are_recorded() {
        let toks = tokenize("bold; fg: red").unwrap();
        assert_eq!(toks[0].offset, 0);
        assert_eq!(toks[2].offset, 6);
    }

    #[test]
    fn bad_character_reports_offset() {
        assert_eq!(tokenize("fg: red @"), Err(8));
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
