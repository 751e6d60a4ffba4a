//! Folding n-ary operations into binary trees.

use kiln_arch::BinaryOperator;

use crate::expr::HdlExpr;

/// Combines operands with a binary operator into one expression.
///
/// For operands `e0, e1, …, eN-1` the result is
/// `e1 ⊕ (e2 ⊕ (… ⊕ (eN-1 ⊕ e0)))`: the first operand is the innermost
/// right-hand leaf and the others nest outward in their original order.
/// Downstream passes rely on this exact shape. No operands yield
/// [`HdlExpr::Empty`]; a single operand is returned unchanged.
pub fn build_binary_chain<I>(operands: I, op: BinaryOperator) -> HdlExpr
where
    I: IntoIterator<Item = HdlExpr>,
{
    let mut operands = operands.into_iter();
    let Some(first) = operands.next() else {
        return HdlExpr::Empty;
    };
    let rest: Vec<HdlExpr> = operands.collect();
    rest.into_iter()
        .rev()
        .fold(first, |inner, operand| HdlExpr::binary(op, operand, inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(i: usize) -> HdlExpr {
        HdlExpr::identifier(format!("e{i}"))
    }

    fn operands(n: usize) -> Vec<HdlExpr> {
        (0..n).map(e).collect()
    }

    fn add(left: HdlExpr, right: HdlExpr) -> HdlExpr {
        HdlExpr::binary(BinaryOperator::Add, left, right)
    }

    #[test]
    fn no_operands_is_empty() {
        assert_eq!(build_binary_chain(Vec::new(), BinaryOperator::Add), HdlExpr::Empty);
    }

    #[test]
    fn single_operand_is_unchanged() {
        let literal = HdlExpr::literal(-3, 8, true);
        assert_eq!(build_binary_chain([literal.clone()], BinaryOperator::Mul), literal);
    }

    #[test]
    fn two_operands() {
        assert_eq!(build_binary_chain(operands(2), BinaryOperator::Add), add(e(1), e(0)));
    }

    #[test]
    fn three_operands() {
        assert_eq!(
            build_binary_chain(operands(3), BinaryOperator::Add),
            add(e(1), add(e(2), e(0)))
        );
    }

    #[test]
    fn four_operands() {
        assert_eq!(
            build_binary_chain(operands(4), BinaryOperator::Add),
            add(e(1), add(e(2), add(e(3), e(0))))
        );
    }

    #[test]
    fn shape_holds_for_longer_chains() {
        for n in 2..12 {
            let chain = build_binary_chain(operands(n), BinaryOperator::Xor);
            assert_eq!(chain.binary_count(), n - 1);
            assert_eq!(chain.depth(), n);

            let mut leaves = Vec::new();
            chain.walk(&mut |node| {
                if let HdlExpr::Identifier(name) = node {
                    leaves.push(name.clone());
                }
            });
            let mut expected: Vec<String> = (1..n).map(|i| format!("e{i}")).collect();
            expected.push("e0".to_string());
            assert_eq!(leaves, expected);
        }
    }

    #[test]
    fn operands_are_not_simplified() {
        let zero = HdlExpr::literal(0, 32, false);
        let chain = build_binary_chain([e(0), zero.clone()], BinaryOperator::Add);
        assert_eq!(chain, add(zero, e(0)));
    }
}
