//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Select;

use crate::pipeline::MissingPolicy;

/// Ask how to treat the rows with missing values
pub fn select_missing_policy(incomplete_rows: usize) -> Result<MissingPolicy> {
    let options = [
        format!("Drop the {} incomplete row(s)", incomplete_rows),
        "Impute missing measurements with the column median".to_string(),
    ];
    let choice = Select::new()
        .with_prompt(format!(
            "{} row(s) contain missing values. How should they be handled?",
            incomplete_rows
        ))
        .items(&options)
        .default(0)
        .interact()?;

    Ok(match choice {
        1 => MissingPolicy::ImputeMedian,
        _ => MissingPolicy::Drop,
    })
}
