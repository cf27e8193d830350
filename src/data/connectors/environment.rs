use crate::error::{GenevoError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static TARGET_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\s+([0-9.]+)").expect("target row pattern"));

/// Target relative expression levels, one per gene in gene index order.
pub fn load_target_expression<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| GenevoError::InputFile(format!("{}: {}", path.display(), e)))?;
    let target = parse_target_expression(&content)
        .map_err(|e| GenevoError::InputFile(format!("{}: {}", path.display(), e)))?;
    log::info!("Loaded {} target expression levels from {}", target.len(), path.display());
    Ok(target)
}

/// Parse `<gene index> <level>` rows.
pub fn parse_target_expression(content: &str) -> Result<Vec<f64>> {
    let target = TARGET_ROW
        .captures_iter(content)
        .map(|caps| {
            let raw = &caps[1];
            raw.parse::<f64>()
                .ok()
                .filter(|level| *level > 0.0)
                .ok_or_else(|| GenevoError::InputFile(format!("invalid target level {:?}", raw)))
        })
        .collect::<Result<Vec<f64>>>()?;

    if target.is_empty() {
        return Err(GenevoError::InputFile("no target expression level found".to_string()));
    }
    Ok(target)
}
