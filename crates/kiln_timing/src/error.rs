//! Errors raised while reading timing reports or pricing operations.

/// Errors from timing-report parsing and the cost model.
///
/// All variants are fatal for a compilation: without a trustworthy delay
/// the generated hardware cannot be cycle-accurate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimingError {
    /// A report line could not be parsed.
    #[error("timing report line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The same operation appears twice in a report.
    #[error("timing report line {line}: duplicate entry for `{operation}`")]
    DuplicateEntry {
        /// 1-based line number of the second occurrence.
        line: usize,
        /// The repeated operation.
        operation: String,
    },

    /// A delay is negative or not a finite number.
    #[error("invalid delay {delay_ns} ns for `{operation}`")]
    InvalidDelay {
        /// The operation the delay belongs to.
        operation: String,
        /// The rejected value.
        delay_ns: f64,
    },

    /// Zero-width operands cannot be priced.
    #[error("cannot price `{operation}`: operand width must be at least one bit")]
    InvalidWidth {
        /// The operation that was requested.
        operation: String,
    },

    /// The report has no entry at any width for the operator.
    #[error("timing report for device '{device}' has no entry for operator `{operator}`; the report is incomplete")]
    MissingOperator {
        /// The device whose report was consulted.
        device: String,
        /// The operator mnemonic.
        operator: String,
    },
}
