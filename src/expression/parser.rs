use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::lexer::{Token, TokenKind, lex};
use crate::foundation::error::{Construct, EvaluationError, NonFiniteReason};

/// A subtree plus its operator depth (a literal has depth 0).
#[derive(Debug)]
pub(crate) struct Parsed {
    pub(crate) expr: Expr,
    pub(crate) depth: usize,
}

pub(crate) fn parse_expr(src: &str, max_depth: usize) -> Result<Parsed, EvaluationError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        max_depth,
        nesting: 0,
    };
    if p.peek().kind == TokenKind::Eof {
        return Err(EvaluationError::parse(p.peek().offset, "empty expression"));
    }
    let expr = p.parse_sum()?;
    p.expect_end()?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    max_depth: usize,
    nesting: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Advance past the current token. Never moves past `Eof`.
    fn bump(&mut self) -> &Token {
        let i = self.pos;
        if i + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[i]
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn too_complex(&self) -> EvaluationError {
        EvaluationError::TooComplex {
            max_depth: self.max_depth,
        }
    }

    /// Run `f` one recursion level deeper.
    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<Parsed, EvaluationError>,
    ) -> Result<Parsed, EvaluationError> {
        self.nesting += 1;
        if self.nesting > self.max_depth {
            return Err(self.too_complex());
        }
        let r = f(self);
        self.nesting -= 1;
        r
    }

    fn node(&self, expr: Expr, depth: usize) -> Result<Parsed, EvaluationError> {
        if depth > self.max_depth {
            return Err(self.too_complex());
        }
        Ok(Parsed { expr, depth })
    }

    fn unary(&self, op: UnaryOp, operand: Parsed) -> Result<Parsed, EvaluationError> {
        let depth = operand.depth + 1;
        self.node(
            Expr::Unary {
                op,
                operand: Box::new(operand.expr),
            },
            depth,
        )
    }

    fn binary(&self, op: BinaryOp, left: Parsed, right: Parsed) -> Result<Parsed, EvaluationError> {
        let depth = left.depth.max(right.depth) + 1;
        self.node(
            Expr::Binary {
                op,
                left: Box::new(left.expr),
                right: Box::new(right.expr),
            },
            depth,
        )
    }

    fn parse_sum(&mut self) -> Result<Parsed, EvaluationError> {
        let mut e = self.parse_product()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let r = self.parse_product()?;
            e = self.binary(op, e, r)?;
        }
        Ok(e)
    }

    fn parse_product(&mut self) -> Result<Parsed, EvaluationError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.bump();
            let r = self.parse_unary()?;
            e = self.binary(op, e, r)?;
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Parsed, EvaluationError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.parse_power(),
        };
        self.bump();
        let operand = self.nested(Self::parse_unary)?;
        self.unary(op, operand)
    }

    fn parse_power(&mut self) -> Result<Parsed, EvaluationError> {
        let base = self.parse_primary()?;
        if self.consume(TokenKind::StarStar) {
            let exponent = self.nested(Self::parse_unary)?;
            return self.binary(BinaryOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Parsed, EvaluationError> {
        let t = self.bump().clone();
        match t.kind {
            // A literal too large for f64 never reaches the tree.
            TokenKind::Number(value) if !value.is_finite() => {
                Err(EvaluationError::NonFiniteResult {
                    reason: NonFiniteReason::Overflow,
                })
            }
            TokenKind::Number(value) => self.node(Expr::Literal { value }, 0),
            TokenKind::LParen => {
                if self.peek().kind == TokenKind::RParen {
                    return Err(EvaluationError::disallowed(
                        t.offset,
                        Construct::CollectionLiteral,
                    ));
                }
                let inner = self.nested(Self::parse_sum)?;
                self.expect_close()?;
                Ok(inner)
            }
            _ => Err(self.reject_operand(&t)),
        }
    }

    fn expect_close(&mut self) -> Result<(), EvaluationError> {
        if self.consume(TokenKind::RParen) {
            return Ok(());
        }
        let t = self.peek();
        Err(self.reject_after_operand().unwrap_or_else(|| {
            let message = match t.kind {
                TokenKind::Eof => "missing closing ')'".to_owned(),
                ref other => format!("expected ')', found {}", other.describe()),
            };
            EvaluationError::parse(t.offset, message)
        }))
    }

    fn expect_end(&mut self) -> Result<(), EvaluationError> {
        let t = self.peek();
        if t.kind == TokenKind::Eof {
            return Ok(());
        }
        Err(self.reject_after_operand().unwrap_or_else(|| {
            EvaluationError::parse(
                t.offset,
                format!("unexpected {} after expression", t.kind.describe()),
            )
        }))
    }

    /// Classify a token found where an operand was expected. `t` has already been consumed.
    fn reject_operand(&self, t: &Token) -> EvaluationError {
        let at = t.offset;
        let construct = match &t.kind {
            TokenKind::Imaginary => Construct::ComplexLiteral,
            TokenKind::Str => Construct::StringLiteral,
            TokenKind::LBracket | TokenKind::LBrace => Construct::CollectionLiteral,
            TokenKind::Tilde => Construct::BitwiseOperator,
            TokenKind::Ident(name) => self.classify_name(name),
            TokenKind::Eof => return EvaluationError::parse(at, "unexpected end of expression"),
            other => {
                return EvaluationError::parse(
                    at,
                    format!("expected a number or '(', found {}", other.describe()),
                );
            }
        };
        EvaluationError::disallowed(at, construct)
    }

    /// Classify an identifier in operand position by spelling and by the token after it.
    fn classify_name(&self, name: &str) -> Construct {
        match name {
            "True" | "False" | "None" => Construct::NamedConstant,
            "and" | "or" | "not" => Construct::BooleanOperator,
            "if" | "else" => Construct::ConditionalExpression,
            "in" | "is" => Construct::Comparison,
            "lambda" => Construct::Lambda,
            "for" => Construct::Comprehension,
            "import" | "from" | "def" | "class" | "return" | "del" | "global" | "nonlocal"
            | "pass" | "raise" | "assert" | "while" | "with" | "try" | "except" | "finally"
            | "break" | "continue" | "yield" | "await" | "async" => Construct::Statement,
            _ => match self.peek().kind {
                TokenKind::LParen => Construct::FunctionCall,
                TokenKind::Dot => Construct::AttributeAccess,
                TokenKind::LBracket => Construct::Subscript,
                TokenKind::Assign | TokenKind::Walrus | TokenKind::AugAssign => {
                    Construct::Assignment
                }
                _ => Construct::NameReference,
            },
        }
    }

    /// Classify the current token when it follows a complete operand. `None` means it is plain
    /// malformed syntax rather than a recognizable construct.
    fn reject_after_operand(&self) -> Option<EvaluationError> {
        let t = self.peek();
        let construct = match &t.kind {
            TokenKind::LParen => Construct::FunctionCall,
            TokenKind::LBracket => Construct::Subscript,
            TokenKind::Dot => Construct::AttributeAccess,
            TokenKind::EqEq
            | TokenKind::Ne
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge => Construct::Comparison,
            TokenKind::Percent => Construct::ModuloOperator,
            TokenKind::SlashSlash => Construct::FloorDivision,
            TokenKind::At => Construct::MatrixMultiplication,
            TokenKind::Amp
            | TokenKind::Pipe
            | TokenKind::Caret
            | TokenKind::Shl
            | TokenKind::Shr => Construct::BitwiseOperator,
            TokenKind::Assign | TokenKind::Walrus | TokenKind::AugAssign => Construct::Assignment,
            TokenKind::Semicolon => Construct::Statement,
            TokenKind::Comma => Construct::CollectionLiteral,
            TokenKind::Ident(name) => match name.as_str() {
                "and" | "or" => Construct::BooleanOperator,
                "if" | "else" => Construct::ConditionalExpression,
                "in" | "is" | "not" => Construct::Comparison,
                "for" | "async" => Construct::Comprehension,
                _ => return None,
            },
            _ => return None,
        };
        Some(EvaluationError::disallowed(t.offset, construct))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
