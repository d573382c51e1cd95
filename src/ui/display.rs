//! Console line vocabulary
//!
//! Every user-visible line goes through one of these helpers so that step,
//! warning and error lines stay visually distinct.

use console::Style;

/// Section header for a pipeline step
pub fn step(message: &str) {
    println!(
        "{} {}",
        Style::new().bold().blue().apply_to("==>"),
        Style::new().bold().apply_to(message)
    );
}

/// Plain informational line
pub fn info(message: &str) {
    println!("    {message}");
}

/// Completed action
pub fn success(message: &str) {
    println!("    {} {message}", Style::new().green().apply_to("✓"));
}

/// Non-fatal problem; the pipeline continues
pub fn warn(message: &str) {
    println!(
        "    {} {}",
        Style::new().yellow().bold().apply_to("!"),
        Style::new().yellow().apply_to(message)
    );
}

/// The single line printed for a fatal error
pub fn error(message: &str) {
    eprintln!(
        "{} {message}",
        Style::new().red().bold().apply_to("✗ Error:")
    );
}

/// Remedy printed under a fatal error
pub fn help(message: &str) {
    eprintln!("  {} {message}", Style::new().cyan().apply_to("help:"));
}

/// Action that dry-run mode would have performed
pub fn dry_run(action: &str) {
    println!(
        "    {} Would execute: {action}",
        Style::new().cyan().bold().apply_to("[DRY RUN]")
    );
}

/// Action echoed by verbose mode before it runs
pub fn verbose(action: &str) {
    println!("    {} {action}", Style::new().dim().apply_to("→"));
}

/// Bold label followed by a value
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("    {} {value}", Style::new().bold().apply_to(label));
}

/// Pass/fail line for a verification check
pub fn check(passed: bool, message: &str) {
    if passed {
        println!("    {} {message}", Style::new().green().apply_to("PASS"));
    } else {
        println!("    {} {message}", Style::new().yellow().apply_to("FAIL"));
    }
}
