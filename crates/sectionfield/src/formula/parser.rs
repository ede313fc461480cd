//! Pratt parser producing the formula AST.
//!
//! Grammar (loosest to tightest): `+ -`, `* / %`, unary `- +`, `^ **`
//! (right-associative), calls and atoms. Unary minus binds looser than
//! exponentiation, so `-2^2 == -4` and `2^-1 == 0.5`.

use std::ops::Range;

use super::lexer::{tokenize, Token};
use crate::error::FormulaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// Formula expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Str(String),
    Var(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Assoc {
    Left,
    Right,
}

const UNARY_PREC: u8 = 30;

fn binary_op_info(token: &Token) -> Option<(u8, Assoc, BinaryOp)> {
    match token {
        Token::Plus => Some((10, Assoc::Left, BinaryOp::Add)),
        Token::Minus => Some((10, Assoc::Left, BinaryOp::Sub)),
        Token::Star => Some((20, Assoc::Left, BinaryOp::Mul)),
        Token::Slash => Some((20, Assoc::Left, BinaryOp::Div)),
        Token::Percent => Some((20, Assoc::Left, BinaryOp::Mod)),
        Token::Caret | Token::StarStar => Some((40, Assoc::Right, BinaryOp::Pow)),
        _ => None,
    }
}

struct TokenStream {
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
    end: usize,
}

impl TokenStream {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.end)
    }

    fn error(&self, message: impl Into<String>) -> FormulaError {
        FormulaError::Parse {
            position: self.current_pos(),
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), FormulaError> {
        if self.peek() == Some(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }
}

/// Parse a complete formula; trailing tokens are an error.
pub fn parse(src: &str) -> Result<Expr, FormulaError> {
    let mut stream = TokenStream {
        tokens: tokenize(src)?,
        pos: 0,
        end: src.len(),
    };
    if stream.peek().is_none() {
        return Err(stream.error("empty formula"));
    }
    let expr = parse_pratt(&mut stream, 0)?;
    match stream.peek() {
        None => Ok(expr),
        Some(tok) => Err(stream.error(format!("unexpected token {tok:?}"))),
    }
}

fn parse_pratt(stream: &mut TokenStream, min_prec: u8) -> Result<Expr, FormulaError> {
    let mut left = parse_prefix(stream)?;

    while let Some(token) = stream.peek() {
        let Some((prec, assoc, op)) = binary_op_info(token) else {
            break;
        };
        if prec < min_prec {
            break;
        }
        stream.advance();
        let next_prec = if assoc == Assoc::Left { prec + 1 } else { prec };
        let right = parse_pratt(stream, next_prec)?;
        left = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }

    Ok(left)
}

fn parse_prefix(stream: &mut TokenStream) -> Result<Expr, FormulaError> {
    match stream.peek() {
        Some(Token::Minus) | Some(Token::Plus) => parse_unary(stream),
        _ => parse_postfix(stream),
    }
}

fn parse_unary(stream: &mut TokenStream) -> Result<Expr, FormulaError> {
    let op = match stream.advance() {
        Some(Token::Minus) => UnaryOp::Neg,
        Some(Token::Plus) => UnaryOp::Pos,
        _ => return Err(stream.error("expected unary operator")),
    };
    let operand = parse_pratt(stream, UNARY_PREC)?;
    Ok(Expr::Unary {
        op,
        operand: Box::new(operand),
    })
}

fn parse_postfix(stream: &mut TokenStream) -> Result<Expr, FormulaError> {
    let atom = parse_atom(stream)?;
    match (atom, stream.peek()) {
        (Expr::Var(func), Some(Token::LParen)) => {
            let args = parse_call_args(stream)?;
            Ok(Expr::Call { func, args })
        }
        (_, Some(Token::LParen)) => Err(stream.error("only named functions can be called")),
        (atom, _) => Ok(atom),
    }
}

fn parse_call_args(stream: &mut TokenStream) -> Result<Vec<Expr>, FormulaError> {
    stream.expect(Token::LParen, "`(`")?;
    let mut args = Vec::new();
    if stream.peek() == Some(&Token::RParen) {
        stream.advance();
        return Ok(args);
    }
    loop {
        args.push(parse_pratt(stream, 0)?);
        match stream.peek() {
            Some(Token::Comma) => {
                stream.advance();
            }
            Some(Token::RParen) => {
                stream.advance();
                break;
            }
            _ => return Err(stream.error("expected `,` or `)` in argument list")),
        }
    }
    Ok(args)
}

fn parse_atom(stream: &mut TokenStream) -> Result<Expr, FormulaError> {
    let position = stream.current_pos();
    match stream.advance() {
        Some(Token::Number(n)) => Ok(Expr::Num(n)),
        Some(Token::Str(s)) => Ok(Expr::Str(s)),
        Some(Token::Ident(name)) => Ok(Expr::Var(name)),
        Some(Token::LParen) => {
            let inner = parse_pratt(stream, 0)?;
            stream.expect(Token::RParen, "`)`")?;
            Ok(inner)
        }
        Some(tok) => Err(FormulaError::Parse {
            position,
            message: format!("unexpected token {tok:?}"),
        }),
        None => Err(FormulaError::Parse {
            position,
            message: "unexpected end of formula".into(),
        }),
    }
}
