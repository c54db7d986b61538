use comfy_table::{ContentArrangement, Table};
use ficha_core::{Catalog, SkillCategory, TraitDefinition};
use ficha_rules::RuleBook;

const TABLES: [&str; 6] = [
    "skills",
    "lineages",
    "peculiarities",
    "trejeitos",
    "advantages",
    "disadvantages",
];

pub fn run(book: &RuleBook, table: Option<&str>) -> Result<(), String> {
    let catalog = book.catalog();
    let wanted: Vec<&str> = match table {
        Some(name) => {
            let name = name.trim().to_lowercase();
            let found = TABLES.iter().find(|t| **t == name).ok_or_else(|| {
                format!("unknown table '{name}' (expected one of: {})", TABLES.join(", "))
            })?;
            vec![*found]
        }
        None => TABLES.to_vec(),
    };

    for name in wanted {
        let table = match name {
            "skills" => skills(catalog),
            "lineages" => lineages(catalog),
            "peculiarities" => traits(&catalog.peculiarities, "Peculiarity"),
            "trejeitos" => traits(&catalog.trejeitos, "Trejeito"),
            "advantages" => modifiers(catalog, true),
            _ => modifiers(catalog, false),
        };
        println!("{table}");
        println!();
    }
    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn skills(catalog: &Catalog) -> Table {
    let mut table = new_table(vec!["Category", "Skills"]);
    for category in SkillCategory::ALL {
        table.add_row(vec![
            category.label().to_string(),
            catalog.skills(category).join(", "),
        ]);
    }
    table
}

fn lineages(catalog: &Catalog) -> Table {
    let mut table = new_table(vec!["Lineage", "Effects"]);
    for lineage in &catalog.lineages {
        let effects: Vec<String> = lineage
            .effects
            .iter()
            .map(|e| {
                let choice = if e.requires_choice { " (choice)" } else { "" };
                format!("{} {:+}{choice}", e.skill, e.bonus)
            })
            .collect();
        table.add_row(vec![lineage.name.clone(), effects.join(", ")]);
    }
    table
}

fn traits(definitions: &[TraitDefinition], header: &str) -> Table {
    let mut table = new_table(vec![header, "Deltas"]);
    for definition in definitions {
        let deltas: Vec<String> = definition
            .deltas
            .iter()
            .map(|d| format!("{} {:+}", d.skill, d.value))
            .collect();
        table.add_row(vec![definition.name.clone(), deltas.join(", ")]);
    }
    table
}

fn modifiers(catalog: &Catalog, advantages: bool) -> Table {
    let (header, list) = if advantages {
        ("Advantage", &catalog.advantages)
    } else {
        ("Disadvantage", &catalog.disadvantages)
    };
    let mut table = new_table(vec![header, "Attribute", "Delta"]);
    for modifier in list {
        table.add_row(vec![
            modifier.name.clone(),
            modifier.attribute.label().to_string(),
            format!("{:+}", modifier.delta),
        ]);
    }
    table
}
