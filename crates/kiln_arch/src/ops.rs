//! Operation descriptors: the keys the cost model prices.
//!
//! An operation is identified by its operator, the bit width of its operands
//! and whether they are signed. Each operator also carries the rule used to
//! extrapolate its delay to widths the timing report never measured.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArchError;

/// A two-operand operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Remainder.
    Mod,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Left shift.
    Shl,
    /// Right shift (arithmetic for signed operands).
    Shr,
    /// Equality.
    Eq,
    /// Inequality.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl BinaryOperator {
    /// Every binary operator, in declaration order.
    pub const ALL: [BinaryOperator; 16] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Mod,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Shl,
        Self::Shr,
        Self::Eq,
        Self::Ne,
        Self::Lt,
        Self::Le,
        Self::Gt,
        Self::Ge,
    ];

    /// Returns the mnemonic used in timing reports.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
        }
    }

    /// Returns `true` for operators producing a one-bit truth value.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }

    /// Returns `true` if operands may be regrouped and reordered freely.
    ///
    /// Only these operators accept more than two operands in a program; any
    /// nesting of them computes the same value in two's-complement arithmetic.
    pub fn is_associative(self) -> bool {
        matches!(self, Self::Add | Self::Mul | Self::And | Self::Or | Self::Xor)
    }

    /// Returns how this operator's delay grows with operand width.
    pub fn scaling_rule(self) -> ScalingRule {
        match self {
            Self::And | Self::Or | Self::Xor => ScalingRule::Constant,
            Self::Shl | Self::Shr => ScalingRule::Logarithmic,
            Self::Mul | Self::Div | Self::Mod => ScalingRule::Quadratic,
            Self::Add
            | Self::Sub
            | Self::Eq
            | Self::Ne
            | Self::Lt
            | Self::Le
            | Self::Gt
            | Self::Ge => ScalingRule::Linear,
        }
    }
}

/// A one-operand operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOperator {
    /// Bitwise NOT.
    Not,
    /// Arithmetic negation.
    Neg,
}

impl UnaryOperator {
    /// Every unary operator, in declaration order.
    pub const ALL: [UnaryOperator; 2] = [Self::Not, Self::Neg];

    /// Returns the mnemonic used in timing reports.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Neg => "neg",
        }
    }

    /// Returns how this operator's delay grows with operand width.
    pub fn scaling_rule(self) -> ScalingRule {
        match self {
            Self::Not => ScalingRule::Constant,
            Self::Neg => ScalingRule::Linear,
        }
    }
}

/// Either kind of operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperatorKind {
    /// A binary operator.
    Binary(BinaryOperator),
    /// A unary operator.
    Unary(UnaryOperator),
}

impl OperatorKind {
    /// Returns the mnemonic used in timing reports.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Binary(op) => op.mnemonic(),
            Self::Unary(op) => op.mnemonic(),
        }
    }

    /// Returns how this operator's delay grows with operand width.
    pub fn scaling_rule(self) -> ScalingRule {
        match self {
            Self::Binary(op) => op.scaling_rule(),
            Self::Unary(op) => op.scaling_rule(),
        }
    }
}

impl From<BinaryOperator> for OperatorKind {
    fn from(op: BinaryOperator) -> Self {
        Self::Binary(op)
    }
}

impl From<UnaryOperator> for OperatorKind {
    fn from(op: UnaryOperator) -> Self {
        Self::Unary(op)
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for OperatorKind {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        BinaryOperator::ALL
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .map(|op| Self::Binary(*op))
            .or_else(|| {
                UnaryOperator::ALL
                    .iter()
                    .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
                    .map(|op| Self::Unary(*op))
            })
            .ok_or_else(|| ArchError::UnknownOperator(s.to_string()))
    }
}

/// How an operator's delay scales from a measured width to another width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalingRule {
    /// Width-independent (bit-parallel logic).
    Constant,
    /// Proportional to `log2(width)` (barrel shifters).
    Logarithmic,
    /// Proportional to width (carry chains, comparators).
    Linear,
    /// Proportional to width squared (multipliers, dividers).
    Quadratic,
}

impl ScalingRule {
    /// Returns the relative size of the logic for the given width.
    ///
    /// Only ratios of this value are meaningful. The function is pure, so
    /// scaled costs are reproducible across runs and machines.
    pub fn weight(self, width_bits: u32) -> f64 {
        let w = f64::from(width_bits);
        match self {
            Self::Constant => 1.0,
            Self::Logarithmic => (w + 1.0).log2(),
            Self::Linear => w,
            Self::Quadratic => w * w,
        }
    }

    /// Scales a delay measured at `from_width` to `to_width`.
    pub fn scale(self, delay: f64, from_width: u32, to_width: u32) -> f64 {
        delay * self.weight(to_width) / self.weight(from_width)
    }
}

/// The key of one priced operation: operator, operand width and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// The operator.
    pub operator: OperatorKind,
    /// Operand size in bits.
    pub width_bits: u32,
    /// Whether the operands are signed.
    pub signed: bool,
}

impl OperationDescriptor {
    /// Describes a binary operation.
    pub fn binary(op: BinaryOperator, width_bits: u32, signed: bool) -> Self {
        Self {
            operator: OperatorKind::Binary(op),
            width_bits,
            signed,
        }
    }

    /// Describes a unary operation.
    pub fn unary(op: UnaryOperator, width_bits: u32, signed: bool) -> Self {
        Self {
            operator: OperatorKind::Unary(op),
            width_bits,
            signed,
        }
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.signed { "signed" } else { "unsigned" };
        write!(f, "{} {}{}", self.operator, sign, self.width_bits)
    }
}
