//! The clock-cycle cost model.
//!
//! Pricing an operation is a pure function of the device manifest, its
//! timing report and the operation descriptor. Drivers do not inherit this
//! logic; they hand their manifest and report to [`clock_cycles`].

use std::cmp::Reverse;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use kiln_arch::{DeviceManifest, OperationDescriptor};
use serde::{Deserialize, Serialize};

use crate::error::TimingError;
use crate::report::TimingReport;

/// A possibly fractional number of clock cycles.
///
/// Combinational operators shorter than the clock period cost less than one
/// cycle, which lets several of them share a state of the generated hardware.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClockCycles(f64);

impl ClockCycles {
    /// No time at all.
    pub const ZERO: Self = Self(0.0);

    /// Wraps a raw cycle count.
    pub fn new(cycles: f64) -> Self {
        Self(cycles)
    }

    /// Returns the raw cycle count.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the whole number of clock cycles needed to cover this cost.
    ///
    /// Always at least one, since a result is registered on a clock edge.
    pub fn ceil_cycles(self) -> u32 {
        let whole = self.0.ceil();
        if whole <= 1.0 {
            1
        } else if whole >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            whole as u32
        }
    }
}

impl Add for ClockCycles {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for ClockCycles {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for ClockCycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} cycles", self.0)
    }
}

/// Where a delay estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelaySource {
    /// The report measured exactly this operation.
    Exact,
    /// Scaled from the nearest measured width.
    Scaled {
        /// Width of the measurement the estimate was scaled from.
        from_width: u32,
        /// Signedness of that measurement.
        from_signed: bool,
    },
}

/// A data-path delay for one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayEstimate {
    /// Delay in nanoseconds.
    pub delay_ns: f64,
    /// Whether the value was measured or extrapolated.
    pub source: DelaySource,
}

/// Looks up or extrapolates the delay of an operation.
///
/// An exact entry wins. Otherwise the measurement of the same operator
/// closest in width is scaled with the operator's [`ScalingRule`]; entries
/// of the same signedness are preferred, and equally close widths resolve to
/// the wider one. Returns `None` if the operator was never measured or the
/// width is zero.
///
/// [`ScalingRule`]: kiln_arch::ScalingRule
pub fn resolve_delay(report: &TimingReport, operation: &OperationDescriptor) -> Option<DelayEstimate> {
    if operation.width_bits == 0 {
        return None;
    }
    if let Some(delay_ns) = report.delay_ns(operation) {
        return Some(DelayEstimate {
            delay_ns,
            source: DelaySource::Exact,
        });
    }

    let nearest = |same_sign_only: bool| {
        report
            .measurements(operation.operator)
            .filter(|(_, signed, _)| !same_sign_only || *signed == operation.signed)
            .min_by_key(|(width, _, _)| (width.abs_diff(operation.width_bits), Reverse(*width)))
    };
    let (from_width, from_signed, measured) = nearest(true).or_else(|| nearest(false))?;

    let rule = operation.operator.scaling_rule();
    Some(DelayEstimate {
        delay_ns: rule.scale(measured, from_width, operation.width_bits),
        source: DelaySource::Scaled {
            from_width,
            from_signed,
        },
    })
}

/// Returns how many clock cycles an operation takes on a device.
///
/// The result is `delay_ns / clock_period_ns`, deterministic for identical
/// inputs.
///
/// # Errors
///
/// Returns [`TimingError::InvalidWidth`] for zero-width operands and
/// [`TimingError::MissingOperator`] when the report has no entry at any width
/// for the operator.
pub fn clock_cycles(
    manifest: &DeviceManifest,
    report: &TimingReport,
    operation: &OperationDescriptor,
) -> Result<ClockCycles, TimingError> {
    if operation.width_bits == 0 {
        return Err(TimingError::InvalidWidth {
            operation: operation.to_string(),
        });
    }

    let estimate = resolve_delay(report, operation).ok_or_else(|| TimingError::MissingOperator {
        device: manifest.name().to_string(),
        operator: operation.operator.mnemonic().to_string(),
    })?;

    if let DelaySource::Scaled {
        from_width,
        from_signed,
    } = estimate.source
    {
        log::debug!(
            "{}: `{operation}` scaled from {} width {from_width}",
            manifest.name(),
            if from_signed { "signed" } else { "unsigned" },
        );
    }

    Ok(ClockCycles(estimate.delay_ns / manifest.clock_period_ns()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_arch::{BinaryOperator, UnaryOperator};
    use kiln_common::Frequency;

    const REPORT: &str = r#"
add  signed32    2.0
add  signed8     0.5
add  unsigned16  1.2
mul  signed16    3.0
shl  unsigned16  0.8
xor  unsigned8   0.3
not  unsigned32  0.25
"#;

    fn manifest_mhz(mhz: u64) -> DeviceManifest {
        DeviceManifest::builder("test device")
            .clock_frequency(Frequency::from_mhz(mhz))
            .available_memory_bytes(1 << 20)
            .build()
            .unwrap()
    }

    fn report() -> TimingReport {
        TimingReport::parse(REPORT).unwrap()
    }

    #[test]
    fn exact_entry_divided_by_period() {
        let m = manifest_mhz(100); // 10 ns period
        let op = OperationDescriptor::binary(BinaryOperator::Add, 32, true);
        assert_eq!(clock_cycles(&m, &report(), &op).unwrap().value(), 0.2);

        let m = manifest_mhz(500); // 2 ns period
        assert_eq!(clock_cycles(&m, &report(), &op).unwrap().value(), 1.0);
    }

    #[test]
    fn linear_scaling_from_nearest_width() {
        let m = manifest_mhz(100);
        let op = OperationDescriptor::binary(BinaryOperator::Add, 64, true);
        // nearest signed entry is 32 bits at 2.0 ns -> 4.0 ns -> 0.4 cycles
        assert_eq!(clock_cycles(&m, &report(), &op).unwrap().value(), 0.4);
    }

    #[test]
    fn quadratic_scaling_for_multipliers() {
        let est = resolve_delay(
            &report(),
            &OperationDescriptor::binary(BinaryOperator::Mul, 32, true),
        )
        .unwrap();
        assert_eq!(est.delay_ns, 12.0);
        assert_eq!(
            est.source,
            DelaySource::Scaled {
                from_width: 16,
                from_signed: true
            }
        );
    }

    #[test]
    fn prefers_same_signedness() {
        // unsigned 32: the only unsigned add is 16 bits, though signed 32 is exact width
        let est = resolve_delay(
            &report(),
            &OperationDescriptor::binary(BinaryOperator::Add, 32, false),
        )
        .unwrap();
        assert_eq!(est.delay_ns, 2.4);
        assert!(matches!(est.source, DelaySource::Scaled { from_width: 16, from_signed: false }));
    }

    #[test]
    fn falls_back_to_other_signedness() {
        let est = resolve_delay(
            &report(),
            &OperationDescriptor::binary(BinaryOperator::Mul, 16, false),
        )
        .unwrap();
        assert_eq!(est.delay_ns, 3.0);
        assert!(matches!(est.source, DelaySource::Scaled { from_width: 16, from_signed: true }));
    }

    #[test]
    fn equidistant_widths_pick_the_wider() {
        // 20 is 12 from 8 and 12 from 32
        let est = resolve_delay(
            &report(),
            &OperationDescriptor::binary(BinaryOperator::Add, 20, true),
        )
        .unwrap();
        assert!(matches!(est.source, DelaySource::Scaled { from_width: 32, .. }));
    }

    #[test]
    fn constant_and_logarithmic_rules() {
        let xor = resolve_delay(
            &report(),
            &OperationDescriptor::binary(BinaryOperator::Xor, 64, false),
        )
        .unwrap();
        assert_eq!(xor.delay_ns, 0.3);

        let shl = resolve_delay(
            &report(),
            &OperationDescriptor::binary(BinaryOperator::Shl, 255, false),
        )
        .unwrap();
        assert!((shl.delay_ns - 0.8 * 8.0 / (17f64).log2()).abs() < 1e-12);
    }

    #[test]
    fn unary_operations_are_priced() {
        let m = manifest_mhz(100);
        let op = OperationDescriptor::unary(UnaryOperator::Not, 32, false);
        assert_eq!(clock_cycles(&m, &report(), &op).unwrap().value(), 0.025);
    }

    #[test]
    fn missing_operator_is_fatal() {
        let m = manifest_mhz(100);
        let op = OperationDescriptor::binary(BinaryOperator::Div, 32, true);
        let err = clock_cycles(&m, &report(), &op).unwrap_err();
        assert_eq!(
            err,
            TimingError::MissingOperator {
                device: "test device".to_string(),
                operator: "div".to_string()
            }
        );
    }

    #[test]
    fn zero_width_is_rejected() {
        let m = manifest_mhz(100);
        let op = OperationDescriptor::binary(BinaryOperator::Add, 0, true);
        assert!(matches!(
            clock_cycles(&m, &report(), &op),
            Err(TimingError::InvalidWidth { .. })
        ));
    }

    #[test]
    fn identical_inputs_give_bit_identical_results() {
        let m = manifest_mhz(300);
        let r = report();
        for width in [1, 7, 13, 32, 33, 100] {
            let op = OperationDescriptor::binary(BinaryOperator::Mul, width, width % 2 == 0);
            let a = clock_cycles(&m, &r, &op).unwrap();
            let b = clock_cycles(&m, &r.clone(), &op).unwrap();
            assert_eq!(a.value().to_bits(), b.value().to_bits());
        }
    }

    #[test]
    fn ceil_cycles_is_at_least_one() {
        assert_eq!(ClockCycles::new(0.0).ceil_cycles(), 1);
        assert_eq!(ClockCycles::new(0.2).ceil_cycles(), 1);
        assert_eq!(ClockCycles::new(1.0).ceil_cycles(), 1);
        assert_eq!(ClockCycles::new(1.01).ceil_cycles(), 2);
        let total: ClockCycles = [0.5, 0.75, 1.0].into_iter().map(ClockCycles::new).sum();
        assert_eq!(total.value(), 2.25);
    }
}
