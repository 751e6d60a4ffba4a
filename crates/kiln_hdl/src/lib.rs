//! Hardware-description expressions and VHDL emission.
//!
//! Programs arrive with n-ary operations, but hardware description
//! languages only have binary operators. [`build_binary_chain`] folds an
//! operand list into a tree of [`HdlExpr`] nodes, which [`vhdl`] renders to
//! source text. The final text travels as a [`HardwareDescription`] tagged
//! with its [`HdlLanguage`].
//!
//! ```
//! use kiln_arch::BinaryOperator;
//! use kiln_hdl::{build_binary_chain, vhdl, HdlExpr};
//!
//! let operands = ["a", "b", "c"].map(HdlExpr::identifier);
//! let chain = build_binary_chain(operands, BinaryOperator::Add);
//! assert_eq!(vhdl::render_expr(&chain), "(b + (c + a))");
//! ```

#![warn(missing_docs)]

pub mod chain;
pub mod description;
pub mod expr;
pub mod vhdl;

pub use chain::build_binary_chain;
pub use description::{HardwareDescription, HdlLanguage};
pub use expr::HdlExpr;
