//! CSV export of the outcome report
//!
//! One record per outcome row: username, outcome, new_password.

use std::io::Write;

use recred_client::OutcomeRow;

use crate::error::{CliError, CliResult};

/// Export outcome rows to CSV format
///
/// # Arguments
/// * `rows` - Outcome report rows
/// * `writer` - Output writer (file or stdout)
pub fn export_outcomes_csv<W: Write>(rows: &[OutcomeRow], writer: W) -> CliResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for row in rows {
        wtr.serialize(row)
            .map_err(|e| CliError::Io(format!("CSV write error: {}", e)))?;
    }

    wtr.flush()
        .map_err(|e| CliError::Io(format!("Failed to flush CSV: {}", e)))?;

    Ok(())
}
