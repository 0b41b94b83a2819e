//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based interactive selection.

use std::io::IsTerminal;

use dialoguer::MultiSelect;
use mapping_core::MappingType;
use mapping_core::batch::ALL;

use crate::error::Result;

/// Type selectors for a command.
///
/// Explicit selectors win. Otherwise an interactive terminal is asked;
/// anything else selects every type.
pub fn type_selectors(given: &[String]) -> Result<Vec<String>> {
    if !given.is_empty() {
        return Ok(given.to_vec());
    }
    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        return select_types();
    }
    Ok(vec![ALL.to_string()])
}

fn select_types() -> Result<Vec<String>> {
    let mut items = vec![ALL.to_string()];
    items.extend(MappingType::all().iter().map(|t| t.value().to_string()));

    let chosen = MultiSelect::new()
        .with_prompt("Select mapping types (space to toggle, enter to confirm)")
        .items(&items)
        .defaults(&[true])
        .interact()?;

    Ok(chosen.into_iter().map(|i| items[i].clone()).collect())
}
