//! Lowering of hardware members to VHDL.
//!
//! Each member becomes one entity. Its body is lowered to a single
//! combinational expression whose critical path is priced with the
//! device's timing report; a counter then holds `done` low for the
//! resulting number of whole clock cycles.

use std::collections::HashMap;
use std::sync::Arc;

use kiln_arch::{BinaryOperator, DeviceManifest, OperationDescriptor, UnaryOperator};
use kiln_hdl::vhdl::{self, PortDirection, VhdlEntity, VhdlType};
use kiln_hdl::{build_binary_chain, HardwareDescription, HdlExpr, HdlLanguage};
use kiln_pipeline::{ready, CancellationToken, PipelineStep, StepError, StepFuture};
use kiln_timing::{ClockCycles, TimingReport};

use crate::context::{CompileContext, MemberCost};
use crate::error::TransformError;
use crate::program::{HardwareMember, ScalarType, TypedExpr};
use crate::steps::HARDWARE_TRANSFORMER_PRIORITY;

/// Generates the hardware description of every member.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareTransformer;

impl PipelineStep<CompileContext> for HardwareTransformer {
    fn name(&self) -> &str {
        "hardware-transformer"
    }

    fn priority(&self) -> f64 {
        HARDWARE_TRANSFORMER_PRIORITY
    }

    fn run<'a>(&'a self, context: &'a mut CompileContext, _cancel: &'a CancellationToken) -> StepFuture<'a> {
        ready(transform(context).map_err(StepError::from))
    }
}

/// Sets the description, member costs and memory layout of the context.
///
/// # Errors
///
/// Fails for an empty program, entity name collisions, malformed member
/// bodies, operators the timing report cannot price, or member data that
/// does not fit the device memory.
pub fn transform(context: &mut CompileContext) -> Result<(), TransformError> {
    if context.program.members.is_empty() {
        return Err(TransformError::NoMembers);
    }

    let driver = Arc::clone(&context.driver);
    let manifest = driver.manifest();
    let report = driver.timing_report()?;

    let mut entities = Vec::with_capacity(context.program.members.len());
    let mut costs = Vec::with_capacity(context.program.members.len());
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut largest_cells = 0;

    for member in &context.program.members {
        let entity_name = vhdl::sanitize_identifier(&format!("{}_{}", context.config.top, member.name));
        if let Some(first) = owners.insert(identifier_key(&entity_name), &member.name) {
            return Err(TransformError::NameCollision {
                first: first.to_string(),
                second: member.name.clone(),
                entity: entity_name,
            });
        }

        check_ports(member)?;
        let lowering = MemberLowering {
            member,
            manifest,
            report,
        };
        let body = lowering.lower(&member.body, true)?;
        let cycles = body.path;
        let wait_cycles = cycles.ceil_cycles();
        log::debug!("{}: critical path {cycles} ({wait_cycles} wait cycles)", member.name);

        entities.push(lowering.render(&entity_name, body, wait_cycles)?);
        costs.push(MemberCost {
            member: member.name.clone(),
            entity: entity_name,
            cycles,
            wait_cycles,
        });
        largest_cells = largest_cells.max(member.memory_cells());
    }

    context.memory_layout = Some(context.memory.plan(largest_cells, manifest)?);
    log::info!(
        "generated {} entities for {} at {}",
        entities.len(),
        manifest.name(),
        manifest.clock_frequency()
    );
    context.member_costs = costs;
    context.description = Some(HardwareDescription::new(entities.join("\n"), HdlLanguage::Vhdl));
    Ok(())
}

/// Name of the entity port carrying a member input.
fn input_port_name(name: &str) -> String {
    vhdl::sanitize_identifier(&format!("in_{name}"))
}

/// VHDL identifiers are case-insensitive.
fn identifier_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Rejects inputs whose port names coincide once sanitized.
fn check_ports(member: &HardwareMember) -> Result<(), TransformError> {
    let mut ports: HashMap<String, &str> = HashMap::with_capacity(member.inputs.len());
    for input in &member.inputs {
        let port = input_port_name(&input.name);
        if let Some(first) = ports.insert(identifier_key(&port), &input.name) {
            return Err(TransformError::PortCollision {
                member: member.name.clone(),
                first: first.to_string(),
                second: input.name.clone(),
                port,
            });
        }
    }
    Ok(())
}

/// A lowered subexpression.
#[derive(Debug)]
struct Lowered {
    expr: HdlExpr,
    ty: ScalarType,
    /// Delay of the longest operator chain ending here.
    path: ClockCycles,
    /// A boolean comparison result rather than a number.
    comparison: bool,
}

impl Lowered {
    fn value(expr: HdlExpr, ty: ScalarType, path: ClockCycles) -> Self {
        Self {
            expr,
            ty,
            path,
            comparison: false,
        }
    }

    /// The expression resized and cast to `ty`.
    fn into_expr(self, ty: ScalarType) -> HdlExpr {
        let mut expr = self.expr;
        if self.ty.width != ty.width {
            expr = expr.resize(ty.width);
        }
        if self.ty.signed != ty.signed {
            let cast = if ty.signed { "signed" } else { "unsigned" };
            expr = HdlExpr::Raw(format!("{cast}({})", vhdl::render_expr(&expr)));
        }
        expr
    }
}

fn later(a: ClockCycles, b: ClockCycles) -> ClockCycles {
    if b > a {
        b
    } else {
        a
    }
}

struct MemberLowering<'a> {
    member: &'a HardwareMember,
    manifest: &'a DeviceManifest,
    report: &'a TimingReport,
}

impl MemberLowering<'_> {
    fn member_name(&self) -> String {
        self.member.name.clone()
    }

    fn checked_type(&self, width: u32, signed: bool) -> Result<ScalarType, TransformError> {
        if width == 0 {
            return Err(TransformError::ZeroWidth {
                member: self.member_name(),
            });
        }
        Ok(ScalarType::new(width, signed))
    }

    fn price(&self, operation: &OperationDescriptor) -> Result<ClockCycles, TransformError> {
        Ok(kiln_timing::clock_cycles(self.manifest, self.report, operation)?)
    }

    /// Lowers `expr`; `top` is set only for the member body itself.
    fn lower(&self, expr: &TypedExpr, top: bool) -> Result<Lowered, TransformError> {
        match expr {
            TypedExpr::Variable { name } => {
                let port = self.member.input(name).ok_or_else(|| TransformError::UnknownVariable {
                    member: self.member_name(),
                    name: name.clone(),
                })?;
                let ty = self.checked_type(port.width, port.signed)?;
                Ok(Lowered::value(
                    HdlExpr::identifier(input_port_name(name)),
                    ty,
                    ClockCycles::ZERO,
                ))
            }
            TypedExpr::Constant { value, width, signed } => {
                let ty = self.checked_type(*width, *signed)?;
                Ok(Lowered::value(
                    HdlExpr::literal(i128::from(*value), *width, *signed),
                    ty,
                    ClockCycles::ZERO,
                ))
            }
            TypedExpr::Unary {
                op,
                operand,
                width,
                signed,
            } => self.lower_unary(*op, operand, self.checked_type(*width, *signed)?),
            TypedExpr::Binary {
                op,
                operands,
                width,
                signed,
            } => self.lower_binary(*op, operands, self.checked_type(*width, *signed)?, top),
        }
    }

    fn lower_unary(&self, op: UnaryOperator, operand: &TypedExpr, ty: ScalarType) -> Result<Lowered, TransformError> {
        if op == UnaryOperator::Neg && !ty.signed {
            return Err(TransformError::UnsignedNegation {
                member: self.member_name(),
            });
        }
        let cost = self.price(&OperationDescriptor::unary(op, ty.width, ty.signed))?;
        let inner = self.lower(operand, false)?;
        let path = inner.path + cost;
        Ok(Lowered::value(HdlExpr::unary(op, inner.into_expr(ty)), ty, path))
    }

    fn lower_binary(
        &self,
        op: BinaryOperator,
        operands: &[TypedExpr],
        ty: ScalarType,
        top: bool,
    ) -> Result<Lowered, TransformError> {
        if op.is_comparison() && !top {
            return Err(TransformError::NestedComparison {
                member: self.member_name(),
            });
        }
        if operands.is_empty() {
            return Err(TransformError::EmptyOperands {
                member: self.member_name(),
                op: op.mnemonic(),
            });
        }
        if !op.is_associative() && operands.len() != 2 {
            return Err(TransformError::OperandCount {
                member: self.member_name(),
                op: op.mnemonic(),
                count: operands.len(),
            });
        }

        let cost = self.price(&OperationDescriptor::binary(op, ty.width, ty.signed))?;
        let lowered = operands
            .iter()
            .map(|operand| self.lower(operand, false))
            .collect::<Result<Vec<_>, _>>()?;

        if op.is_associative() {
            return Ok(chain(op, lowered, ty, cost));
        }

        let mut lowered = lowered.into_iter();
        let (Some(left), Some(right)) = (lowered.next(), lowered.next()) else {
            return Err(TransformError::OperandCount {
                member: self.member_name(),
                op: op.mnemonic(),
                count: operands.len(),
            });
        };
        let path = later(left.path, right.path) + cost;
        let left = left.into_expr(ty);
        // Shift amounts go through `to_integer` and keep their own type.
        let right = match op {
            BinaryOperator::Shl | BinaryOperator::Shr => right.expr,
            _ => right.into_expr(ty),
        };

        if op.is_comparison() {
            return Ok(Lowered {
                expr: HdlExpr::binary(op, left, right),
                ty: ScalarType::new(1, false),
                path,
                comparison: true,
            });
        }
        Ok(Lowered::value(HdlExpr::binary(op, left, right), ty, path))
    }

    /// Renders the member's entity.
    fn render(&self, entity_name: &str, body: Lowered, wait_cycles: u32) -> Result<String, TransformError> {
        let member = self.member;
        let mut entity = VhdlEntity::new(entity_name);
        entity.add_port("clk", PortDirection::In, "std_logic");
        entity.add_port("start", PortDirection::In, "std_logic");
        for input in &member.inputs {
            let ty = self.checked_type(input.width, input.signed)?;
            entity.add_port(input_port_name(&input.name), PortDirection::In, VhdlType::new(ty.width, ty.signed));
        }
        let result = self.checked_type(member.result.width, member.result.signed)?;
        entity.add_port("result", PortDirection::Out, VhdlType::new(result.width, result.signed));
        entity.add_port("done", PortDirection::Out, "std_logic");

        entity.add_declaration(format!("constant WAIT_CYCLES : positive := {wait_cycles};"));
        entity.add_declaration("signal remaining : natural range 0 to WAIT_CYCLES - 1 := 0;");
        entity.add_declaration("signal busy : std_logic := '0';");

        if body.comparison {
            if result.width != 1 {
                return Err(TransformError::ComparisonWidth {
                    member: member.name.clone(),
                    width: result.width,
                });
            }
            let condition = vhdl::render_expr(&body.expr);
            entity.add_statement(format!("result <= \"1\" when {condition} else \"0\";"));
        } else {
            let value = vhdl::render_expr(&body.into_expr(result));
            entity.add_statement(format!("result <= {value};"));
        }
        entity.add_statement(WAIT_COUNTER);
        Ok(entity.render())
    }
}

/// Holds `done` low for `WAIT_CYCLES` clock cycles after `start`.
const WAIT_COUNTER: &str = "\
process (clk)
begin
    if rising_edge(clk) then
        done <= '0';
        if busy = '0' then
            if start = '1' then
                busy <= '1';
                remaining <= WAIT_CYCLES - 1;
            end if;
        elsif remaining = 0 then
            busy <= '0';
            done <= '1';
        else
            remaining <= remaining - 1;
        end if;
    end if;
end process;";

/// Lowers an n-ary associative operation through the chain builder.
///
/// The critical path follows the chain's shape: `e0` enters at the
/// innermost node, every other operand one node further out.
fn chain(op: BinaryOperator, operands: Vec<Lowered>, ty: ScalarType, cost: ClockCycles) -> Lowered {
    let nodes = operands.len().saturating_sub(1);
    let mut paths = operands.iter().map(|o| o.path);
    let first = paths.next().unwrap_or(ClockCycles::ZERO);
    let rest: Vec<_> = paths.collect();
    let path = rest.iter().rev().fold(first, |inner, &operand| later(inner, operand) + cost);

    let expr = build_binary_chain(operands.into_iter().map(|o| o.into_expr(ty)), op);
    let expr = if op == BinaryOperator::Mul {
        resize_products(expr, nodes, ty.width)
    } else {
        expr
    };
    Lowered::value(expr, ty, path)
}

/// Wraps the top `nodes` products of a chain in `resize`, since a
/// `numeric_std` product is as wide as both factors together.
fn resize_products(expr: HdlExpr, nodes: usize, width: u32) -> HdlExpr {
    if nodes == 0 {
        return expr;
    }
    match expr {
        HdlExpr::Binary { op, left, right } => HdlExpr::Binary {
            op,
            left,
            right: Box::new(resize_products(*right, nodes - 1, width)),
        }
        .resize(width),
        other => other,
    }
}
