//! The timing table and its text format.
//!
//! Reports are line based. Each non-comment line has three fields:
//!
//! ```text
//! # operator  type        delay_ns
//! add         signed32    1.824
//! mul         unsigned16  4.310
//! ```
//!
//! `type` is `signed<N>` or `unsigned<N>`; `delay_ns` is the data-path delay
//! of the combinational operator in nanoseconds. `#` starts a comment that
//! runs to the end of the line.

use std::collections::BTreeMap;

use kiln_arch::{OperationDescriptor, OperatorKind};

use crate::error::TimingError;

/// Measured data-path delays per operation for one device.
///
/// Delays are not required to fit in a clock cycle, nor to be whole
/// multiples of one; the cost model converts them to fractional cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingReport {
    entries: BTreeMap<OperationDescriptor, f64>,
}

impl TimingReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a report from its text form.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed line, unknown operator, zero width,
    /// invalid delay or duplicate entry, naming the offending line.
    pub fn parse(source: &str) -> Result<Self, TimingError> {
        let mut report = Self::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let fields: Vec<&str> = content.split_whitespace().collect();
            let [op, ty, delay] = fields[..] else {
                return Err(TimingError::Parse {
                    line,
                    reason: format!("expected 3 fields, found {}", fields.len()),
                });
            };

            let operator: OperatorKind = op.parse().map_err(|e| TimingError::Parse {
                line,
                reason: format!("{e}"),
            })?;
            let (signed, width_bits) = parse_operand_type(ty).ok_or_else(|| TimingError::Parse {
                line,
                reason: format!("invalid operand type `{ty}` (expected signed<N> or unsigned<N>)"),
            })?;
            let delay_ns: f64 = delay.parse().map_err(|_| TimingError::Parse {
                line,
                reason: format!("invalid delay `{delay}`"),
            })?;

            let operation = OperationDescriptor {
                operator,
                width_bits,
                signed,
            };
            if report.entries.contains_key(&operation) {
                return Err(TimingError::DuplicateEntry {
                    line,
                    operation: operation.to_string(),
                });
            }
            report.insert(operation, delay_ns)?;
        }

        Ok(report)
    }

    /// Records the delay of one operation, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Rejects zero-width operations and delays that are negative or not finite.
    pub fn insert(&mut self, operation: OperationDescriptor, delay_ns: f64) -> Result<(), TimingError> {
        if operation.width_bits == 0 {
            return Err(TimingError::InvalidWidth {
                operation: operation.to_string(),
            });
        }
        if !delay_ns.is_finite() || delay_ns < 0.0 {
            return Err(TimingError::InvalidDelay {
                operation: operation.to_string(),
                delay_ns,
            });
        }
        self.entries.insert(operation, delay_ns);
        Ok(())
    }

    /// Returns the measured delay of exactly this operation, if present.
    pub fn delay_ns(&self, operation: &OperationDescriptor) -> Option<f64> {
        self.entries.get(operation).copied()
    }

    /// Iterates over the measurements of one operator as `(width, signed, delay_ns)`.
    ///
    /// Entries come out in ascending width order, unsigned before signed at
    /// equal widths.
    pub fn measurements(&self, operator: OperatorKind) -> impl Iterator<Item = (u32, bool, f64)> + '_ {
        self.entries
            .iter()
            .filter(move |(key, _)| key.operator == operator)
            .map(|(key, delay)| (key.width_bits, key.signed, *delay))
    }

    /// Returns the number of measured operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was measured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses `signed<N>` / `unsigned<N>` into `(signed, N)`; `N` must be positive.
fn parse_operand_type(ty: &str) -> Option<(bool, u32)> {
    let lower = ty.to_ascii_lowercase();
    let (signed, digits) = if let Some(rest) = lower.strip_prefix("unsigned") {
        (false, rest)
    } else if let Some(rest) = lower.strip_prefix("signed") {
        (true, rest)
    } else {
        return None;
    };
    let width: u32 = digits.parse().ok()?;
    (width > 0).then_some((signed, width))
}
