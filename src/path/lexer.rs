//! Lexer for SVG path data using logos

use logos::{Logos, SpannedIter};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r\f,]+")]
pub enum Token {
    // Every command letter of the path grammar, implemented or not
    #[regex(r"[MmLlHhVvCcSsQqTtAaZz]", |lex| lex.slice().chars().next())]
    Command(char),

    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok().filter(|v| v.is_finite()))]
    Number(f64),
}

/// Spanned token stream over path data (or a `points` list).
///
/// Unrecognized input is yielded as `Err(())` so the parser can report its offset.
pub fn lex(input: &str) -> SpannedIter<'_, Token> {
    Token::lexer(input).spanned()
}
