//! Parser for cQASM listings.
//!
//! Accepts both scheduled listings (sections, braced bundles, skips) and
//! flat listings (instructions directly under sections). Bundle cycle
//! annotations are checked against the cycles accounted for by preceding
//! bundles and skips.

use std::str::FromStr;

use qlower_ir::{CmpOp, Condition, GateKind, Operation, QubitId, RegisterId};

use crate::error::{EmitError, EmitResult};
use crate::lexer::{SpannedToken, Token, tokenize};
use crate::listing::{Listing, ListingBundle, ListingInstruction, ListingItem};

/// Parse a listing.
pub fn parse(source: &str) -> EmitResult<Listing> {
    let mut parser = Parser::new(source)?;
    parser.parse_listing()
}

/// Parser state.
struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Cycles covered so far by bundles and skips.
    cursor: u64,
}

impl Parser {
    /// Create a new parser from source.
    fn new(source: &str) -> EmitResult<Self> {
        let mut tokens = Vec::new();

        for result in tokenize(source) {
            match result {
                Ok(t) => tokens.push(t),
                Err((span, message)) => {
                    let line = source[..span.start].matches('\n').count() + 1;
                    return Err(EmitError::LexerError {
                        line,
                        position: span.start,
                        message,
                    });
                }
            }
        }

        Ok(Self {
            tokens,
            pos: 0,
            cursor: 0,
        })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Line of the current token, or of the last one at end of input.
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos)?.token.clone();
        self.pos += 1;
        Some(token)
    }

    fn unexpected(&self, expected: &str, found: &Token) -> EmitError {
        EmitError::UnexpectedToken {
            line: self.line(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    fn expect(&mut self, expected: Token) -> EmitResult<()> {
        let line = self.line();
        let found = self
            .advance()
            .ok_or_else(|| EmitError::UnexpectedEof(format!("expected {expected}")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(EmitError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_identifier(&mut self) -> EmitResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(EmitError::UnexpectedToken {
                line,
                expected: "identifier".into(),
                found: other.to_string(),
            }),
            None => Err(EmitError::UnexpectedEof("expected identifier".into())),
        }
    }

    fn parse_int_literal(&mut self) -> EmitResult<u64> {
        let line = self.line();
        match self.advance() {
            Some(Token::IntLiteral(n)) => Ok(n),
            Some(other) => Err(EmitError::UnexpectedToken {
                line,
                expected: "integer".into(),
                found: other.to_string(),
            }),
            None => Err(EmitError::UnexpectedEof("expected integer".into())),
        }
    }

    fn parse_string_literal(&mut self) -> EmitResult<String> {
        let line = self.line();
        match self.advance() {
            Some(Token::StringLiteral(s)) => Ok(s),
            Some(other) => Err(EmitError::UnexpectedToken {
                line,
                expected: "string".into(),
                found: other.to_string(),
            }),
            None => Err(EmitError::UnexpectedEof("expected string".into())),
        }
    }

    /// `pragma @<ns>.name("<program>")` followed by items.
    fn parse_listing(&mut self) -> EmitResult<Listing> {
        self.expect(Token::Pragma)?;
        self.expect(Token::At)?;
        let namespace = self.parse_identifier()?;
        self.expect(Token::Dot)?;
        let key = self.parse_identifier()?;
        if key != "name" {
            return Err(self.unexpected("name", &Token::Identifier(key)));
        }
        self.expect(Token::LParen)?;
        let name = self.parse_string_literal()?;
        self.expect(Token::RParen)?;

        let mut items = Vec::new();
        while !self.is_eof() {
            items.push(self.parse_item()?);
        }

        Ok(Listing {
            namespace,
            name,
            items,
        })
    }

    fn parse_item(&mut self) -> EmitResult<ListingItem> {
        match self.peek() {
            Some(Token::Dot) => {
                self.pos += 1;
                Ok(ListingItem::Section(self.parse_identifier()?))
            }
            Some(Token::Skip) => {
                let line = self.line();
                self.pos += 1;
                let n = self.parse_int_literal()?;
                self.advance_cursor(n, line)?;
                Ok(ListingItem::Skip(n))
            }
            Some(Token::LBrace) => self.parse_bundle().map(ListingItem::Bundle),
            Some(Token::Identifier(_)) => self.parse_instruction().map(ListingItem::Unscheduled),
            Some(other) => Err(self.unexpected("section, bundle, skip or instruction", other)),
            None => Err(EmitError::UnexpectedEof("expected item".into())),
        }
    }

    fn parse_bundle(&mut self) -> EmitResult<ListingBundle> {
        let line = self.line();
        self.expect(Token::LBrace)?;

        let cycle = match self.peek() {
            Some(Token::CycleMarker(c)) => {
                let c = *c;
                self.pos += 1;
                c
            }
            _ => self.cursor,
        };
        if cycle != self.cursor {
            return Err(EmitError::CycleMismatch {
                line,
                expected: self.cursor,
                found: cycle,
            });
        }

        let mut instructions = Vec::new();
        while !self.consume(&Token::RBrace) {
            if self.is_eof() {
                return Err(EmitError::UnexpectedEof("expected }".into()));
            }
            instructions.push(self.parse_instruction()?);
        }

        self.advance_cursor(1, line)?;
        Ok(ListingBundle {
            cycle,
            instructions,
        })
    }

    fn advance_cursor(&mut self, cycles: u64, line: usize) -> EmitResult<()> {
        self.cursor = self
            .cursor
            .checked_add(cycles)
            .ok_or(EmitError::CycleOverflow { line })?;
        Ok(())
    }

    fn parse_instruction(&mut self) -> EmitResult<ListingInstruction> {
        let line = self.line();
        let mnemonic = self.parse_identifier()?;

        match mnemonic.as_str() {
            "cmp" => {
                self.expect(Token::Dot)?;
                let op_name = self.parse_identifier()?;
                let op = CmpOp::from_mnemonic(&op_name).ok_or_else(|| EmitError::UnknownGate {
                    line,
                    name: format!("cmp.{op_name}"),
                })?;
                let lhs = self.parse_operand("r")?;
                self.expect(Token::Comma)?;
                let rhs = self.parse_operand("r")?;
                Ok(ListingInstruction::Compare(Condition::new(
                    RegisterId(lhs),
                    op,
                    RegisterId(rhs),
                )))
            }
            "br" => {
                self.expect(Token::Dot)?;
                let target = self.parse_identifier()?;
                if target != "else" {
                    return Err(EmitError::UnknownGate {
                        line,
                        name: format!("br.{target}"),
                    });
                }
                Ok(ListingInstruction::BranchElse)
            }
            _ => {
                let kind = GateKind::from_str(&mnemonic).map_err(|_| EmitError::UnknownGate {
                    line,
                    name: mnemonic.clone(),
                })?;
                let mut qubits = vec![QubitId(self.parse_operand("q")?)];
                while self.consume(&Token::Comma) {
                    qubits.push(QubitId(self.parse_operand("q")?));
                }
                Ok(ListingInstruction::Op(Operation::from_kind(kind, &qubits)?))
            }
        }
    }

    /// `<prefix>[<index>]`
    fn parse_operand(&mut self, prefix: &str) -> EmitResult<u32> {
        let line = self.line();
        let name = self.parse_identifier()?;
        if name != prefix {
            return Err(EmitError::UnexpectedToken {
                line,
                expected: format!("{prefix}[..]"),
                found: name,
            });
        }
        self.expect(Token::LBracket)?;
        let index = self.parse_int_literal()?;
        self.expect(Token::RBracket)?;
        u32::try_from(index).map_err(|_| EmitError::UnexpectedToken {
            line,
            expected: "32-bit index".into(),
            found: index.to_string(),
        })
    }
}
