//! Logos-based lexer for weight-law formulas.

use std::ops::Range;

use logos::Logos;

use crate::error::FormulaError;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // --- Literals ---
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Identifier, possibly namespaced (`math.sin`, `np.pi`).
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'[^']*'"#, |lex| unquote(lex.slice()))]
    Str(String),

    // --- Operators ---
    #[token("**")]
    StarStar,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,

    // --- Delimiters ---
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
}

fn unquote(s: &str) -> String {
    s[1..s.len() - 1].to_string()
}

/// Tokenize a formula into `(token, byte span)` pairs.
pub fn tokenize(src: &str) -> Result<Vec<(Token, Range<usize>)>, FormulaError> {
    let mut out = Vec::new();
    for (tok, span) in Token::lexer(src).spanned() {
        match tok {
            Ok(tok) => out.push((tok, span)),
            Err(()) => {
                return Err(FormulaError::Parse {
                    position: span.start,
                    message: format!("unexpected input `{}`", &src[span]),
                })
            }
        }
    }
    Ok(out)
}
