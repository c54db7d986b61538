use std::path::Path;

use ficha_core::Attribute;
use ficha_rules::{RuleBook, attribute_value, skill_value};

pub fn run(book: &RuleBook, file: &Path, label: &str, sub: Option<&str>) -> Result<(), String> {
    let character = super::load_character(file)?;

    if let Ok(attribute) = Attribute::from_label(label) {
        let value = attribute_value(book, &character, attribute);
        println!("  {}: {value}", attribute.label());
        return Ok(());
    }

    let value = skill_value(book, &character, label, sub).map_err(|e| e.to_string())?;
    match sub.map(str::trim).filter(|s| !s.is_empty()) {
        Some(sub) => println!("  {label} ({sub}): {value}"),
        None => println!("  {label}: {value}"),
    }
    Ok(())
}
