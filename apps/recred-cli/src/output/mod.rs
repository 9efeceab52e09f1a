//! Terminal output helpers

mod printer;
pub mod table;

pub use printer::{print_info, print_success, print_warning};
pub use table::print_outcome_table;
