//! Lexer for cQASM listings.

use logos::{FilterResult, Lexer, Logos};
use std::fmt;

/// Tokens of a scheduled or flat listing.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Keywords
    #[token("pragma")]
    Pragma,

    #[token("skip")]
    Skip,

    // Bundle annotation. Other comments are dropped; an annotation whose
    // cycle does not parse is an error.
    #[regex(r"#[^\n]*", cycle_marker)]
    CycleMarker(u64),

    // Punctuation
    #[token("@")]
    At,

    #[token(".")]
    Dot,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    // Literals
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    StringLiteral(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*", |lex| lex.slice().to_string())]
    Identifier(String),
}

fn cycle_marker(lex: &mut Lexer<'_, Token>) -> FilterResult<u64, ()> {
    let body = lex.slice().trim_start_matches('#').trim();
    match body.strip_prefix("start at cycle") {
        Some(n) => match n.trim().parse() {
            Ok(cycle) => FilterResult::Emit(cycle),
            Err(_) => FilterResult::Error(()),
        },
        None => FilterResult::Skip,
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Pragma => write!(f, "pragma"),
            Token::Skip => write!(f, "skip"),
            Token::CycleMarker(c) => write!(f, "# start at cycle {c}"),
            Token::At => write!(f, "@"),
            Token::Dot => write!(f, "."),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::IntLiteral(n) => write!(f, "{n}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
        }
    }
}

/// A token with its source position.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: std::ops::Range<usize>,
    /// 1-based line number.
    pub line: usize,
}

/// Tokenize a listing.
pub fn tokenize(source: &str) -> Vec<Result<SpannedToken, (std::ops::Range<usize>, String)>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut counted = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += source[counted..span.start].matches('\n').count();
        counted = span.start;

        if let Ok(token) = result {
            tokens.push(Ok(SpannedToken { token, span, line }));
        } else {
            let slice = &source[span.clone()];
            tokens.push(Err((span, format!("Invalid token: '{slice}'"))));
        }
    }

    tokens
}
