use anyhow::Result;
use std::io::{self, Write};

pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

/// Show the proposed build change before writing anything.
pub fn display_proposed_build(old_build: &str, new_build: &str) {
    println!("\n\x1b[1mProposed Build Change:\x1b[0m");
    println!("  From: \x1b[31m{}\x1b[0m", old_build);
    println!("  To:   \x1b[32m{}\x1b[0m", new_build);
}

/// Ask a yes/no question; anything other than y/yes counts as no.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
