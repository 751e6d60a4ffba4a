//! The typed program handed over by the front-end.
//!
//! The front-end parses and type-checks the source program; the core only
//! sees the members selected for hardware, with explicit widths and
//! signedness on every operation. The model is exchanged as JSON:
//!
//! ```json
//! {
//!   "assemblies": [{ "file": "bin/Calc.dll" }],
//!   "members": [{
//!     "name": "Calc::Sum3",
//!     "inputs": [
//!       { "name": "a", "width": 32, "signed": true },
//!       { "name": "b", "width": 32, "signed": true },
//!       { "name": "c", "width": 32, "signed": true }
//!     ],
//!     "result": { "width": 32, "signed": true },
//!     "body": {
//!       "kind": "binary", "op": "add", "width": 32, "signed": true,
//!       "operands": [
//!         { "kind": "variable", "name": "a" },
//!         { "kind": "variable", "name": "b" },
//!         { "kind": "variable", "name": "c" }
//!       ]
//!     }
//!   }]
//! }
//! ```

use std::path::{Path, PathBuf};

use kiln_arch::{BinaryOperator, UnaryOperator};
use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Where a compiled assembly of the source program lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblySource {
    /// An assembly file on disk.
    File(PathBuf),
    /// An assembly generated in memory, identified by name.
    InMemory(String),
}

/// Width and signedness of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScalarType {
    /// Width in bits.
    pub width: u32,
    /// Two's-complement signed if `true`.
    pub signed: bool,
}

impl ScalarType {
    /// Creates a scalar type.
    pub fn new(width: u32, signed: bool) -> Self {
        Self { width, signed }
    }

    /// Number of 32-bit memory cells a value of this type occupies.
    pub fn cells(&self) -> u64 {
        u64::from(self.width.div_ceil(32))
    }
}

/// An input of a hardware member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Input name, referenced by [`TypedExpr::Variable`].
    pub name: String,
    /// Width in bits.
    pub width: u32,
    /// Signedness.
    pub signed: bool,
}

impl Port {
    /// Returns the port's type.
    pub fn ty(&self) -> ScalarType {
        ScalarType::new(self.width, self.signed)
    }
}

/// A typed expression.
///
/// Operation nodes carry the width and signedness they compute in; for
/// comparisons these describe the compared operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypedExpr {
    /// A member input.
    Variable {
        /// The input name.
        name: String,
    },
    /// A constant.
    Constant {
        /// The value.
        value: i64,
        /// Width in bits.
        width: u32,
        /// Signedness.
        signed: bool,
    },
    /// An operator applied to one or more operands.
    ///
    /// Associative operators accept any number of operands; all others
    /// take exactly two.
    Binary {
        /// The operator.
        op: BinaryOperator,
        /// The operands, in source order.
        operands: Vec<TypedExpr>,
        /// Width of the computation.
        width: u32,
        /// Signedness of the computation.
        signed: bool,
    },
    /// A unary operator.
    Unary {
        /// The operator.
        op: UnaryOperator,
        /// The operand.
        operand: Box<TypedExpr>,
        /// Width of the computation.
        width: u32,
        /// Signedness of the computation.
        signed: bool,
    },
}

impl TypedExpr {
    /// Creates a variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }

    /// Creates a binary operation.
    pub fn binary(op: BinaryOperator, ty: ScalarType, operands: Vec<TypedExpr>) -> Self {
        Self::Binary {
            op,
            operands,
            width: ty.width,
            signed: ty.signed,
        }
    }
}

/// A member of the source program implemented in hardware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareMember {
    /// Full name of the member in the source program.
    pub name: String,
    /// Inputs in declaration order.
    pub inputs: Vec<Port>,
    /// Type of the returned value.
    pub result: ScalarType,
    /// The computed expression.
    pub body: TypedExpr,
}

impl HardwareMember {
    /// Returns the input with this name.
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Memory cells needed to pass the inputs in and the result out.
    pub fn memory_cells(&self) -> u64 {
        self.inputs
            .iter()
            .map(|p| p.ty().cells())
            .sum::<u64>()
            + self.result.cells()
    }
}

/// The program to compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedProgram {
    /// Compiled assemblies of the source program.
    pub assemblies: Vec<AssemblySource>,
    /// Members to implement in hardware.
    pub members: Vec<HardwareMember>,
}

impl TypedProgram {
    /// Parses a program from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Program`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, CompileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a program from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is malformed.
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let json = std::fs::read_to_string(path).map_err(|source| CompileError::ProgramRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Returns the on-disk assembly paths, or the first in-memory assembly.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::NoAssemblies`] for an empty list and
    /// [`CompileError::InMemoryAssembly`] for any in-memory assembly.
    pub fn assembly_paths(&self) -> Result<Vec<PathBuf>, CompileError> {
        if self.assemblies.is_empty() {
            return Err(CompileError::NoAssemblies);
        }
        self.assemblies
            .iter()
            .map(|assembly| match assembly {
                AssemblySource::File(path) => Ok(path.clone()),
                AssemblySource::InMemory(name) => Err(CompileError::InMemoryAssembly { name: name.clone() }),
            })
            .collect()
    }
}
