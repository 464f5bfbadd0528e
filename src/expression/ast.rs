use std::fmt;

/// Operation tree. Closed: a parse can only ever produce these three node kinds.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum Expr {
    Literal {
        value: f64,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum UnaryOp {
    Neg,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl UnaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
        }
    }
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        }
    }
}

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Self::Literal { .. } => PREC_ATOM,
            Self::Unary { .. } => PREC_UNARY,
            Self::Binary { op, .. } => match op {
                BinaryOp::Add | BinaryOp::Sub => PREC_SUM,
                BinaryOp::Mul | BinaryOp::Div => PREC_PRODUCT,
                BinaryOp::Pow => PREC_POWER,
            },
        }
    }
}

/// Format a number so that it lexes back to the same value.
pub(crate) fn fmt_number(v: f64) -> String {
    let a = v.abs();
    if v.is_finite() && a != 0.0 && !(1e-6..1e16).contains(&a) {
        format!("{v:e}")
    } else {
        format!("{v}")
    }
}

fn write_child(f: &mut fmt::Formatter<'_>, e: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

// Canonical rendering with the minimum parentheses needed to re-parse to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { value } => f.write_str(&fmt_number(*value)),
            Self::Unary { op, operand } => {
                f.write_str(op.symbol())?;
                write_child(f, operand, operand.precedence() < PREC_UNARY)
            }
            Self::Binary { op, left, right } => {
                let p = self.precedence();
                // `**` is right-associative and takes a signed right operand.
                let (lp, rp) = if *op == BinaryOp::Pow {
                    (left.precedence() <= p, right.precedence() < PREC_UNARY)
                } else {
                    (left.precedence() < p, right.precedence() <= p)
                };
                write_child(f, left, lp)?;
                write!(f, " {} ", op.symbol())?;
                write_child(f, right, rp)
            }
        }
    }
}
