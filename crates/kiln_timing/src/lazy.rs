//! One-time parse of a driver's timing report.

use std::fmt;
use std::sync::OnceLock;

use crate::error::TimingError;
use crate::report::TimingReport;

type ParseFn = dyn Fn() -> Result<TimingReport, TimingError> + Send + Sync;

/// A timing report that is parsed on first use and then shared.
///
/// Concurrent first calls to [`get`](Self::get) run the parse function
/// exactly once; every caller observes the same stored result. Reads after
/// initialization take no lock.
///
/// Report sources are static text, so a parse failure is deterministic and
/// is cached like a success.
pub struct LazyTimingReport {
    parse: Box<ParseFn>,
    cell: OnceLock<Result<TimingReport, TimingError>>,
}

impl LazyTimingReport {
    /// Creates a lazy report backed by an arbitrary parse function.
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn() -> Result<TimingReport, TimingError> + Send + Sync + 'static,
    {
        Self {
            parse: Box::new(parse),
            cell: OnceLock::new(),
        }
    }

    /// Creates a lazy report that parses the given report text.
    pub fn from_source(source: &'static str) -> Self {
        Self::new(move || TimingReport::parse(source))
    }

    /// Returns the parsed report, parsing it on the first call.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the report text is malformed.
    pub fn get(&self) -> Result<&TimingReport, TimingError> {
        let stored = self.cell.get_or_init(|| {
            let parsed = (self.parse)();
            match &parsed {
                Ok(report) => log::debug!("parsed timing report with {} entries", report.len()),
                Err(e) => log::warn!("timing report failed to parse: {e}"),
            }
            parsed
        });
        stored.as_ref().map_err(Clone::clone)
    }

    /// Returns `true` once the report has been parsed.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for LazyTimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyTimingReport")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn parses_on_first_access_only() {
        let lazy = LazyTimingReport::from_source("add signed32 1.0\n");
        assert!(!lazy.is_initialized());
        assert_eq!(lazy.get().unwrap().len(), 1);
        assert!(lazy.is_initialized());
    }

    #[test]
    fn concurrent_first_access_parses_once() {
        let parses = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&parses);
        let lazy = LazyTimingReport::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            TimingReport::parse("add signed32 1.0\nmul signed32 4.0\n")
        });

        let addresses: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| lazy.get().unwrap() as *const TimingReport as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(parses.load(Ordering::SeqCst), 1);
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn parse_error_is_cached() {
        let parses = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&parses);
        let lazy = LazyTimingReport::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            TimingReport::parse("garbage")
        });
        assert!(lazy.get().is_err());
        assert!(lazy.get().is_err());
        assert_eq!(parses.load(Ordering::SeqCst), 1);
    }
}
