use comfy_table::{ContentArrangement, Table};
use dropper_core::{DropItem, DropTable};

use super::percent;

pub fn run(items: Vec<DropItem>, json: bool) -> Result<(), String> {
    let table = DropTable::new(items);

    if json {
        let rows: Vec<_> = table
            .items()
            .iter()
            .map(|item| {
                serde_json::json!({
                    "id": item.id(),
                    "chances": item.chances(),
                    "always": item.always_drop(),
                    "effective": item.effective_chances(),
                    "gentle": item.gentle_chances(),
                })
            })
            .collect();
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    if table.is_empty() {
        println!("  No droppable items.");
        return Ok(());
    }

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Item", "Chance", "Guaranteed", "Effective", "Gentle"]);

    for item in table.items() {
        out.add_row(vec![
            item.id().to_string(),
            percent(item.chances()),
            item.always_drop().to_string(),
            percent(item.effective_chances()),
            percent(item.gentle_chances()),
        ]);
    }

    println!("{out}");
    println!();
    println!("  {} items, rarest first", table.len());

    Ok(())
}
