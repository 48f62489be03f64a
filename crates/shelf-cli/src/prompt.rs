//! Interactive prompts

use anyhow::Result;
use std::io::{self, Write};

use crate::output::Output;

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

/// Decide whether a delete goes ahead
///
/// Only human output with `confirm_deletes` on asks; everything else
/// proceeds. `ask` is called after the notice is printed.
pub fn approve_delete(
    notice: &str,
    confirm_deletes: bool,
    output: &Output,
    ask: impl FnOnce() -> Result<bool>,
) -> Result<bool> {
    if !confirm_deletes || !output.should_prompt() {
        return Ok(true);
    }

    println!("{}", notice);
    if ask()? {
        Ok(true)
    } else {
        println!("Cancelled.");
        Ok(false)
    }
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_approve_delete_asks_humans() {
        let human = Output::new(OutputFormat::Human);

        assert!(approve_delete("Delete?", true, &human, || Ok(true)).unwrap());
        assert!(!approve_delete("Delete?", true, &human, || Ok(false)).unwrap());
    }

    #[test]
    fn test_approve_delete_skips_prompt() {
        let never = || -> Result<bool> { panic!("should not ask") };

        let human = Output::new(OutputFormat::Human);
        assert!(approve_delete("Delete?", false, &human, never).unwrap());

        let json = Output::new(OutputFormat::Json);
        assert!(approve_delete("Delete?", true, &json, never).unwrap());

        let quiet = Output::new(OutputFormat::Quiet);
        assert!(approve_delete("Delete?", true, &quiet, never).unwrap());
    }

    #[test]
    fn test_approve_delete_propagates_prompt_errors() {
        let human = Output::new(OutputFormat::Human);
        let result = approve_delete("Delete?", true, &human, || anyhow::bail!("stdin closed"));
        assert!(result.is_err());
    }
}
