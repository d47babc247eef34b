//! Lexer for the `transform` attribute grammar using logos

use logos::Logos;

use crate::error::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    // Operation names; unknown names are rejected by the grammar
    #[regex(r"[a-zA-Z]+", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok().filter(|v| v.is_finite()))]
    Number(f64),

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
}

/// Lex a transform list into tokens with spans.
///
/// Unlike the path lexer, unrecognized input is kept as `Err(())` so the caller
/// can report it instead of silently dropping it.
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}

/// Human-readable token description for error messages
pub fn describe(token: &Token) -> String {
    match token {
        Token::Ident(name) => format!("'{}'", name),
        Token::Number(n) => format!("number {}", n),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
    }
}
