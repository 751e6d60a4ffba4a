//! VHDL rendering.
//!
//! Operands are `numeric_std` vectors. Binary nodes are always fully
//! parenthesized, so the rendered text has exactly the tree's shape no
//! matter how VHDL would associate the operators. Comparisons render as
//! `boolean` expressions; turning one into a vector is up to the caller.

use std::fmt;

use kiln_arch::{BinaryOperator, UnaryOperator};

use crate::expr::HdlExpr;

/// Largest magnitude that fits in a VHDL `integer` on every tool.
const VHDL_INTEGER_MAX: u128 = i32::MAX as u128;

const RESERVED_WORDS: &[&str] = &[
    "abs", "access", "after", "alias", "all", "and", "architecture", "array", "assert", "begin",
    "block", "body", "buffer", "bus", "case", "component", "configuration", "constant", "downto",
    "else", "elsif", "end", "entity", "exit", "file", "for", "function", "generate", "generic",
    "if", "in", "inout", "is", "label", "library", "loop", "map", "mod", "nand", "new", "next",
    "nor", "not", "null", "of", "on", "open", "or", "others", "out", "package", "port",
    "procedure", "process", "range", "record", "register", "rem", "report", "return", "rol",
    "ror", "select", "signal", "sla", "sll", "sra", "srl", "subtype", "then", "to", "type",
    "until", "use", "variable", "wait", "when", "while", "with", "xnor", "xor",
];

/// A `numeric_std` vector type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VhdlType {
    /// Width in bits.
    pub width: u32,
    /// `signed` or `unsigned`.
    pub signed: bool,
}

impl VhdlType {
    /// Creates a vector type.
    pub fn new(width: u32, signed: bool) -> Self {
        Self { width, signed }
    }
}

impl fmt::Display for VhdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = if self.signed { "signed" } else { "unsigned" };
        write!(f, "{base}({} downto 0)", self.width.saturating_sub(1))
    }
}

/// Renders an expression as VHDL source text.
///
/// [`HdlExpr::Empty`] renders as nothing.
pub fn render_expr(expr: &HdlExpr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_expr(out: &mut String, expr: &HdlExpr) {
    match expr {
        HdlExpr::Empty => {}
        HdlExpr::Identifier(name) => out.push_str(name),
        HdlExpr::Raw(text) => out.push_str(text),
        HdlExpr::Literal {
            value,
            width,
            signed,
        } => write_literal(out, *value, *width, *signed),
        HdlExpr::Unary { op, operand } => {
            out.push_str(match op {
                UnaryOperator::Not => "(not ",
                UnaryOperator::Neg => "(-",
            });
            write_expr(out, operand);
            out.push(')');
        }
        HdlExpr::Binary { op, left, right } => match shift_function(*op) {
            Some(function) => {
                out.push_str(function);
                out.push('(');
                write_expr(out, left);
                out.push_str(", to_integer(");
                write_expr(out, right);
                out.push_str("))");
            }
            None => {
                out.push('(');
                write_expr(out, left);
                out.push(' ');
                out.push_str(binary_symbol(*op));
                out.push(' ');
                write_expr(out, right);
                out.push(')');
            }
        },
        HdlExpr::Resize { operand, width } => {
            out.push_str("resize(");
            write_expr(out, operand);
            out.push_str(&format!(", {width})"));
        }
    }
}

fn shift_function(op: BinaryOperator) -> Option<&'static str> {
    match op {
        BinaryOperator::Shl => Some("shift_left"),
        BinaryOperator::Shr => Some("shift_right"),
        _ => None,
    }
}

/// Infix symbol of an operator. Shifts are rendered as calls instead.
fn binary_symbol(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Sub => "-",
        BinaryOperator::Mul => "*",
        BinaryOperator::Div => "/",
        // Truncating remainder: the sign follows the dividend.
        BinaryOperator::Mod => "rem",
        BinaryOperator::And => "and",
        BinaryOperator::Or => "or",
        BinaryOperator::Xor => "xor",
        BinaryOperator::Eq => "=",
        BinaryOperator::Ne => "/=",
        BinaryOperator::Lt => "<",
        BinaryOperator::Le => "<=",
        BinaryOperator::Gt => ">",
        BinaryOperator::Ge => ">=",
        BinaryOperator::Shl => "sll",
        BinaryOperator::Shr => "srl",
    }
}

fn write_literal(out: &mut String, value: i128, width: u32, signed: bool) {
    let fits_integer = value.unsigned_abs() <= VHDL_INTEGER_MAX && (signed || value >= 0);
    if fits_integer {
        let function = if signed { "to_signed" } else { "to_unsigned" };
        out.push_str(&format!("{function}({value}, {width})"));
    } else {
        let base = if signed { "signed" } else { "unsigned" };
        out.push_str(base);
        out.push_str("'(\"");
        for bit in (0..width).rev() {
            let set = if bit < 128 {
                (value >> bit) & 1 == 1
            } else {
                value < 0
            };
            out.push(if set { '1' } else { '0' });
        }
        out.push_str("\")");
    }
}

/// Returns `true` if `name` is a basic VHDL identifier that is not reserved.
pub fn is_valid_identifier(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.ends_with('_')
        && !name.contains("__")
        && !is_reserved(name)
}

fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
}

/// Maps an arbitrary name to a valid VHDL identifier.
///
/// Runs of other characters become one underscore; a leading non-letter or
/// a reserved word gets a `k_` prefix. Valid identifiers are returned as-is.
pub fn sanitize_identifier(name: &str) -> String {
    if is_valid_identifier(name) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let mut result = out.trim_matches('_').to_string();
    if result.is_empty() {
        return "unnamed".to_string();
    }
    if !result.starts_with(|c: char| c.is_ascii_alphabetic()) || is_reserved(&result) {
        result.insert_str(0, "k_");
    }
    result
}

/// Direction of an entity port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    /// Driven from outside.
    In,
    /// Driven by the entity.
    Out,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
        })
    }
}

/// One port of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhdlPort {
    /// Port name.
    pub name: String,
    /// Port direction.
    pub direction: PortDirection,
    /// Port type as VHDL text, e.g. `std_logic`.
    pub ty: String,
}

/// A single-architecture VHDL design unit.
///
/// Declarations and statements are kept as text in insertion order and
/// indented on rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhdlEntity {
    name: String,
    ports: Vec<VhdlPort>,
    declarations: Vec<String>,
    statements: Vec<String>,
}

impl VhdlEntity {
    /// Creates an entity with no ports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
            declarations: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// The entity name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ports in declaration order.
    pub fn ports(&self) -> &[VhdlPort] {
        &self.ports
    }

    /// Adds a port.
    pub fn add_port(&mut self, name: impl Into<String>, direction: PortDirection, ty: impl fmt::Display) {
        self.ports.push(VhdlPort {
            name: name.into(),
            direction,
            ty: ty.to_string(),
        });
    }

    /// Adds an architecture declaration such as a signal or constant.
    pub fn add_declaration(&mut self, declaration: impl Into<String>) {
        self.declarations.push(declaration.into());
    }

    /// Adds a concurrent statement; may span several lines.
    pub fn add_statement(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    /// Renders the complete design unit.
    pub fn render(&self) -> String {
        let name = &self.name;
        let mut out = String::new();
        out.push_str("-- Generated by kiln. Do not edit.\n");
        out.push_str("library ieee;\n");
        out.push_str("use ieee.std_logic_1164.all;\n");
        out.push_str("use ieee.numeric_std.all;\n\n");

        out.push_str(&format!("entity {name} is\n"));
        if !self.ports.is_empty() {
            out.push_str("    port (\n");
            for (i, port) in self.ports.iter().enumerate() {
                let separator = if i + 1 == self.ports.len() { "" } else { ";" };
                out.push_str(&format!(
                    "        {} : {} {}{separator}\n",
                    port.name, port.direction, port.ty
                ));
            }
            out.push_str("    );\n");
        }
        out.push_str(&format!("end entity {name};\n\n"));

        out.push_str(&format!("architecture rtl of {name} is\n"));
        for declaration in &self.declarations {
            push_indented(&mut out, declaration);
        }
        out.push_str("begin\n");
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            push_indented(&mut out, statement);
        }
        out.push_str("end architecture rtl;\n");
        out
    }
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
}
