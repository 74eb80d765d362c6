pub mod chances;
pub mod roll;

use dropper_core::{DropItem, DropTable};

/// Build a table from command-line items plus an optional JSON array.
fn build_table(items: Vec<DropItem>, table_json: Option<&str>) -> Result<DropTable, String> {
    let mut all = items;
    if let Some(json) = table_json {
        let extra = DropTable::from_json(json).map_err(|e| format!("--table-json: {e}"))?;
        all.extend(extra.items().iter().cloned());
    }
    Ok(DropTable::new(all))
}

/// Format a percentage without trailing zeros (e.g. `55%`, `0.05%`).
fn percent(value: f64) -> String {
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    format!("{s}%")
}
