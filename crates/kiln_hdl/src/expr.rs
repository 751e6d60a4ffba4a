//! The expression tree handed to HDL renderers.

use kiln_arch::{BinaryOperator, UnaryOperator};

/// A hardware-description expression.
///
/// Operators are strictly binary or unary. No node is simplified on
/// construction; folding and identities belong to later passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HdlExpr {
    /// A placeholder with no value. Traversals visit it like any leaf.
    Empty,
    /// A reference to a port, signal or variable.
    Identifier(String),
    /// A sized integer constant.
    Literal {
        /// The value; must be representable in `width` bits.
        value: i128,
        /// Width in bits.
        width: u32,
        /// Whether the literal is signed.
        signed: bool,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOperator,
        /// The operand.
        operand: Box<HdlExpr>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOperator,
        /// Left operand.
        left: Box<HdlExpr>,
        /// Right operand.
        right: Box<HdlExpr>,
    },
    /// Truncation or extension to a width, keeping signedness.
    Resize {
        /// The operand.
        operand: Box<HdlExpr>,
        /// Target width in bits.
        width: u32,
    },
    /// Target-language text emitted verbatim.
    Raw(String),
}

impl HdlExpr {
    /// Creates an identifier reference.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    /// Creates a sized literal.
    pub fn literal(value: i128, width: u32, signed: bool) -> Self {
        Self::Literal {
            value,
            width,
            signed,
        }
    }

    /// Creates a unary node.
    pub fn unary(op: UnaryOperator, operand: HdlExpr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Creates a binary node.
    pub fn binary(op: BinaryOperator, left: HdlExpr, right: HdlExpr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Wraps the expression in a resize to `width` bits.
    pub fn resize(self, width: u32) -> Self {
        Self::Resize {
            operand: Box::new(self),
            width,
        }
    }

    /// Returns `true` for [`HdlExpr::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Visits every node in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a HdlExpr)) {
        visit(self);
        match self {
            Self::Unary { operand, .. } | Self::Resize { operand, .. } => operand.walk(visit),
            Self::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Self::Empty | Self::Identifier(_) | Self::Literal { .. } | Self::Raw(_) => {}
        }
    }

    /// Returns the number of binary operator nodes.
    pub fn binary_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if matches!(node, Self::Binary { .. }) {
                count += 1;
            }
        });
        count
    }

    /// Returns the nesting depth; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::Unary { operand, .. } | Self::Resize { operand, .. } => 1 + operand.depth(),
            Self::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            Self::Empty | Self::Identifier(_) | Self::Literal { .. } | Self::Raw(_) => 1,
        }
    }
}
