//! Table display helpers for the outcome report

use recred_client::OutcomeRow;

/// Truncate a string for table display, handling Unicode safely.
///
/// If the string exceeds `max_len`, it is truncated with "..." appended.
/// Uses character boundaries to avoid panicking on multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Print the outcome report as a fixed-width table.
pub fn print_outcome_table(rows: &[OutcomeRow]) {
    println!(
        "{:<32} {:<22} {:<20}",
        "USERNAME", "OUTCOME", "NEW PASSWORD"
    );
    println!("{}", "-".repeat(76));

    for row in rows {
        println!(
            "{:<32} {:<22} {:<20}",
            truncate(&row.username, 30),
            row.outcome,
            row.new_password
        );
    }
}
