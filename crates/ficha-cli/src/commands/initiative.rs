use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ficha_rules::RuleBook;

use crate::input::EncounterFile;

pub fn run(book: &RuleBook, file: &Path) -> Result<(), String> {
    let (mut encounter, entries, _) = EncounterFile::load(file)?.into_parts(book.config().seed)?;
    let requests = entries
        .iter()
        .map(|entry| entry.to_request(&encounter))
        .collect::<Result<Vec<_>, _>>()?;

    let round = encounter.start_round();
    let order = encounter
        .roll_initiative(book, round, &requests)
        .map_err(|e| e.to_string())?;

    println!("  {} round {round}", "Initiative".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Team", "Base", "Roll", "Modifier", "Total"]);
    for (position, result) in order.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            result.name.clone(),
            result.team.clone(),
            result.base.to_string(),
            result.roll.to_string(),
            format!("{:+}", result.modifier),
            result.total.to_string(),
        ]);
    }
    println!("{table}");

    Ok(())
}
