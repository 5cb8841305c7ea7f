//! Candidate list loading

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{default_candidates, Candidate};

/// Read the candidate list from a JSON array, or fall back to the six defaults
pub fn load_candidates(path: Option<&Path>) -> Result<Vec<Candidate>> {
    let Some(path) = path else {
        return Ok(default_candidates());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model list: {}", path.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&text)
        .with_context(|| format!("Invalid model list in {}", path.display()))?;

    if candidates.is_empty() {
        anyhow::bail!("Model list {} contains no candidates", path.display());
    }

    let mut seen = std::collections::HashSet::new();
    for candidate in &candidates {
        if !seen.insert(candidate.name.as_str()) {
            anyhow::bail!(
                "Duplicate candidate name '{}' in {}",
                candidate.name,
                path.display()
            );
        }
    }

    Ok(candidates)
}
