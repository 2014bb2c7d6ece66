//! Export of simulation results

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::payoff::SimulationResult;

/// Write the per-debt monthly ledger as CSV, one row per open debt per month
pub fn write_ledger_csv<W: Write>(writer: W, result: &SimulationResult) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for month in &result.timeline {
        for row in &month.debts {
            csv_writer.serialize(row)?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the ledger CSV to a file
pub fn write_ledger_csv_file<P: AsRef<Path>>(path: P, result: &SimulationResult) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    write_ledger_csv(file, result)
}

/// Serialize a result to pretty-printed JSON
pub fn to_json(result: &SimulationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
