//! Export formats for the outcome report

mod csv;

pub use csv::export_outcomes_csv;
