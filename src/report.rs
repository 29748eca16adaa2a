use std::io;
use std::io::Write;
use std::time::Duration;
use std::time::Instant;

use crate::Cost;
use crate::HashTable;

/// Table sizes exercised by the default report configuration.
pub const DEFAULT_SIZES: &[usize] = &[100, 1_000, 10_000, 100_000];

/// Default number of timed operations per table entry.
pub const DEFAULT_OPERATIONS_MULTIPLIER: usize = 2;

/// Parameters for a comparative timing run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Table sizes to measure, one report row each.
    pub sizes: Vec<usize>,
    /// Operations performed (and separately warmed up) per table entry.
    pub operations_multiplier: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            operations_multiplier: DEFAULT_OPERATIONS_MULTIPLIER,
        }
    }
}

/// One measured table size: average wall-clock time per insert under both
/// cost configurations.
///
/// Times are genuine nanoseconds, computed from [`Instant`] deltas divided by
/// the operation count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// The table size this row was measured at.
    pub size: usize,
    /// Average nanoseconds per insert with the Θ(log n) surcharge enabled.
    pub log_n_nanos_per_op: u64,
    /// Average nanoseconds per insert without the surcharge.
    pub constant_nanos_per_op: u64,
}

/// Times `size * operations_multiplier` insertions against a table that was
/// pre-populated with `size / 2` entries and warmed up with another
/// `size * operations_multiplier` insertions, all under the given `cost`.
///
/// `keygen` must yield keys that are unique for the lifetime of the call;
/// duplicate keys would turn insertions into overwrites and understate the
/// resize costs being measured.
pub fn measure<F>(size: usize, operations_multiplier: usize, cost: Cost, keygen: &mut F) -> Duration
where
    F: FnMut() -> String,
{
    let mut table = HashTable::new();
    let total_operations = size * operations_multiplier;

    for _ in 0..size / 2 {
        table.insert(keygen(), "seed".to_owned(), cost);
    }
    for _ in 0..total_operations {
        table.insert(keygen(), "warmup".to_owned(), cost);
    }

    let started = Instant::now();
    for _ in 0..total_operations {
        table.insert(keygen(), "timed".to_owned(), cost);
    }
    started.elapsed()
}

/// Runs the full comparison: one [`ReportRow`] per configured size, each
/// measured once with [`Cost::LogN`] and once with [`Cost::Constant`].
pub fn run<F>(config: &ReportConfig, keygen: &mut F) -> Vec<ReportRow>
where
    F: FnMut() -> String,
{
    config
        .sizes
        .iter()
        .map(|&size| {
            let log_n = measure(size, config.operations_multiplier, Cost::LogN, keygen);
            let constant = measure(size, config.operations_multiplier, Cost::Constant, keygen);
            let total_operations = (size * config.operations_multiplier).max(1) as u128;
            ReportRow {
                size,
                log_n_nanos_per_op: (log_n.as_nanos() / total_operations) as u64,
                constant_nanos_per_op: (constant.as_nanos() / total_operations) as u64,
            }
        })
        .collect()
}

/// Writes the comma-separated report: a `Size,TimeLogN,TimeConstant` header
/// followed by one row per measured size. The time columns are average
/// nanoseconds per operation.
pub fn write_csv<W: Write>(rows: &[ReportRow], mut writer: W) -> io::Result<()> {
    writeln!(writer, "Size,TimeLogN,TimeConstant")?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{}",
            row.size, row.log_n_nanos_per_op, row.constant_nanos_per_op
        )?;
    }
    Ok(())
}
