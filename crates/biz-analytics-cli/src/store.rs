//! Ledger file handling: one pretty-printed JSON document holding the
//! whole snapshot store.

use biz_analytics_core::ledger::Ledger;
use std::fs;
use std::path::Path;

/// Load the ledger, or start an empty one when the file does not exist yet.
pub fn load(path: &Path) -> Result<Ledger, Box<dyn std::error::Error>> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "ledger file not found, starting empty");
        return Ok(Ledger::new());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read ledger '{}': {}", path.display(), e))?;
    let ledger: Ledger = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse ledger '{}': {}", path.display(), e))?;

    tracing::info!(
        path = %path.display(),
        records = ledger.records().len(),
        sales = ledger.sales().len(),
        "loaded ledger"
    );
    Ok(ledger)
}

/// Persist the ledger. The stored document is the snapshot: derived KPI
/// figures are written as computed and never recomputed on load.
pub fn save(path: &Path, ledger: &Ledger) -> Result<(), Box<dyn std::error::Error>> {
    let contents = serde_json::to_string_pretty(ledger)?;
    fs::write(path, contents)
        .map_err(|e| format!("Failed to write ledger '{}': {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "saved ledger");
    Ok(())
}
