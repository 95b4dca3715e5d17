use std::fmt;

use serde::{Deserialize, Serialize};

/// Register identifier as produced by the decoder. Names come from the
/// target's register table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinOp {
    Add,
    Sub,
}

/// Symbolic operand supplied by the caller's symbol layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expr {
    Constant(i64),
    Symbol(String),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(name.into())
    }

    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary { op: BinOp::Add, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    pub fn sub(lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary { op: BinOp::Sub, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// Fold to a number. Any symbol makes the expression non-constant.
    pub fn evaluate_as_absolute(&self) -> Option<i64> {
        match self {
            Expr::Constant(v) => Some(*v),
            Expr::Symbol(_) => None,
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.evaluate_as_absolute()?;
                let r = rhs.evaluate_as_absolute()?;
                Some(match op {
                    BinOp::Add => l.wrapping_add(r),
                    BinOp::Sub => l.wrapping_sub(r),
                })
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant(v) => write!(f, "{v}"),
            Expr::Symbol(name) => f.write_str(name),
            Expr::Binary { op, lhs, rhs } => {
                // Negative constants on the right read better as a subtraction.
                match (op, rhs.as_ref()) {
                    (BinOp::Add, Expr::Constant(v)) if *v < 0 => {
                        write!(f, "{lhs}-{}", v.unsigned_abs())
                    }
                    (BinOp::Add, _) => write!(f, "{lhs}+{rhs}"),
                    (BinOp::Sub, Expr::Constant(v)) if *v < 0 => {
                        write!(f, "{lhs}+{}", v.unsigned_abs())
                    }
                    (BinOp::Sub, Expr::Binary { .. }) => write!(f, "{lhs}-({rhs})"),
                    (BinOp::Sub, _) => write!(f, "{lhs}-{rhs}"),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operand {
    Reg(RegId),
    Imm(i64),
    Expr(Expr),
}

impl Operand {
    pub fn reg(id: u16) -> Self {
        Operand::Reg(RegId(id))
    }

    /// Value of an immediate, or of an expression that folds to a constant.
    pub fn evaluate_constant_imm(&self) -> Option<i64> {
        match self {
            Operand::Imm(v) => Some(*v),
            Operand::Expr(e) => e.evaluate_as_absolute(),
            Operand::Reg(_) => None,
        }
    }
}
