use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ficha_core::Archetype;
use ficha_rules::{EffectScope, RuleBook, sheet_summary};

pub fn run(book: &RuleBook, file: &Path, show_effects: bool) -> Result<(), String> {
    let character = super::load_character(file)?;
    let summary = sheet_summary(book, &character);

    let heritage = match (character.archetype, character.lineage.as_deref()) {
        (Archetype::DivineDescendant, Some(lineage)) => format!("{}, {lineage}", character.archetype),
        (archetype, _) => archetype.to_string(),
    };
    println!("  {} ({heritage})", character.name.bold());
    println!();

    let mut attributes = Table::new();
    attributes.set_content_arrangement(ContentArrangement::Dynamic);
    attributes.set_header(vec!["Attribute", "Base", "Value"]);
    for (attribute, value) in &summary.attributes {
        attributes.add_row(vec![
            attribute.label().to_string(),
            character.attributes.get(*attribute).to_string(),
            value.to_string(),
        ]);
    }
    println!("{attributes}");
    println!();

    let mut skills = Table::new();
    skills.set_content_arrangement(ContentArrangement::Dynamic);
    skills.set_header(vec!["Group", "Skill", "Rank", "Value"]);
    for line in &summary.skills {
        skills.add_row(vec![
            line.group.clone(),
            line.name.clone(),
            super::or_dash(line.rank),
            line.value.to_string(),
        ]);
    }
    println!("{skills}");

    if !summary.specializations.is_empty() {
        println!();
        let mut specs = Table::new();
        specs.set_content_arrangement(ContentArrangement::Dynamic);
        specs.set_header(vec!["Specialization", "Sub-skill", "Rank", "Value"]);
        for line in &summary.specializations {
            specs.add_row(vec![
                line.group.clone(),
                line.name.clone(),
                super::or_dash(line.rank),
                line.value.to_string(),
            ]);
        }
        println!("{specs}");
    }

    if show_effects {
        println!();
        println!("  {}", "Trait Effects".bold().underline());
        if summary.effects.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for effect in &summary.effects {
            let scope = match effect.scope {
                EffectScope::Individual => "",
                EffectScope::Category => " (all)",
            };
            println!(
                "  {:+} {}{scope}  {}",
                effect.value,
                effect.skill,
                format!("from {}", effect.source).dimmed()
            );
        }
    }

    Ok(())
}
