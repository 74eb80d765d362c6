use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dropper_core::{DropEntry, DropItem, RollConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub fn run(
    items: Vec<DropItem>,
    table_json: Option<&str>,
    config: &RollConfig,
    history: &[DropEntry],
    seed: Option<u64>,
    json: bool,
) -> Result<(), String> {
    let table = super::build_table(items, table_json)?;
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let outcome = table.resolve(config, history, &mut rng);

    if json {
        let mut value = serde_json::to_value(&outcome)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        value["seed"] = serde_json::json!(seed);
        let out = serde_json::to_string_pretty(&value)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "  {} {} {}",
        "Roll".bold(),
        config.algorithm,
        format!("(seed={seed})").dimmed()
    );

    if outcome.is_empty() {
        println!("  {}", "No drops.".dimmed());
    } else {
        let mut out = Table::new();
        out.set_content_arrangement(ContentArrangement::Dynamic);
        out.set_header(vec!["Item", "Quantity"]);
        for entry in &outcome.drops {
            let id = if outcome.gifted.as_deref() == Some(entry.id.as_str()) {
                format!("{} (gift)", entry.id)
            } else {
                entry.id.clone()
            };
            out.add_row(vec![id, entry.quantity.to_string()]);
        }
        println!("{out}");
    }

    println!();
    println!(
        "  {} trials, {} successful",
        outcome.trials, outcome.successes
    );
    if let Some(id) = &outcome.gifted {
        println!("  {} {}", "Gift:".green().bold(), id);
    }
    if outcome.capped {
        println!(
            "  {}",
            format!("Trial cap reached after {} trials", outcome.trials).yellow()
        );
    }

    Ok(())
}
