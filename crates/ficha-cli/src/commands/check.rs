use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ficha_rules::{RuleBook, SkillCheckResult, TestBatch};

use crate::input::EncounterFile;

pub fn run(book: &RuleBook, file: &Path) -> Result<(), String> {
    let (mut encounter, _, batches) = EncounterFile::load(file)?.into_parts(book.config().seed)?;
    if batches.is_empty() {
        println!("  No batches found.");
        return Ok(());
    }

    let round = encounter.start_round();
    for batch_file in batches {
        let name = batch_file.config.name.clone();
        let selections = batch_file
            .selections
            .iter()
            .map(|entry| entry.to_selection(&encounter))
            .collect::<Result<Vec<_>, _>>()?;
        let id = encounter
            .create_batch(book, round, batch_file.config, selections, Utc::now())
            .map_err(|e| format!("batch '{name}': {e}"))?;
        let batch = encounter.batch(round, id).map_err(|e| e.to_string())?;
        print_batch(batch);
    }

    let spent: Vec<String> = encounter
        .ledger()
        .consumed()
        .filter_map(|id| encounter.character(id))
        .map(|c| c.name.clone())
        .collect();
    if !spent.is_empty() {
        println!("  Gambiarra spent: {}", spent.join(", "));
    }

    Ok(())
}

fn print_batch(batch: &TestBatch) {
    println!("  {} {} '{}'", "Batch".bold(), batch.id, batch.name);
    match batch.global_difficulty {
        Some(difficulty) if batch.summed => {
            println!("  {}", format!("sum {} vs difficulty {difficulty}", batch.sum()).dimmed());
        }
        Some(difficulty) => println!("  {}", format!("difficulty {difficulty} each").dimmed()),
        None => {}
    }
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Name", "Team", "Check", "Attribute", "Skill", "Attr", "Roll", "Total", "Result",
    ]);
    for result in &batch.results {
        table.add_row(row(result));
    }
    println!("{table}");

    for result in &batch.results {
        if let Some(flavor) = &result.flavor {
            println!("  {}: {}", result.name, flavor.text.italic());
        }
    }
    println!();
}

fn row(result: &SkillCheckResult) -> Vec<String> {
    let mut skill = result.skill.clone();
    if result.terrain_advantage {
        skill.push_str(" [+terrain]");
    }
    if result.terrain_disadvantage {
        skill.push_str(" [-terrain]");
    }
    let verdict = match result.success {
        Some(true) => "success".to_string(),
        Some(false) => "failure".to_string(),
        None => "—".to_string(),
    };
    if result.gambiarra {
        return vec![
            result.name.clone(),
            result.team.clone(),
            skill,
            "—".to_string(),
            "—".to_string(),
            "—".to_string(),
            "—".to_string(),
            "gambiarra".to_string(),
            verdict,
        ];
    }
    vec![
        result.name.clone(),
        result.team.clone(),
        skill,
        result.attribute.label().to_string(),
        result.skill_value.to_string(),
        result.attribute_value.to_string(),
        result.roll.to_string(),
        result.total.to_string(),
        verdict,
    ]
}
