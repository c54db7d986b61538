pub mod catalog;
pub mod check;
pub mod initiative;
pub mod sheet;
pub mod validate;
pub mod value;

use std::path::Path;

use ficha_core::{Catalog, Character};
use ficha_rules::{RuleBook, RulesConfig};

/// Build the rule book from optional catalog and rules files.
pub fn load_book(catalog: Option<&Path>, rules: Option<&Path>) -> Result<RuleBook, String> {
    let catalog = match catalog {
        Some(path) => Catalog::from_path(path).map_err(|e| e.to_string())?,
        None => Catalog::standard(),
    };
    let config = match rules {
        Some(path) => RulesConfig::from_path(path).map_err(|e| e.to_string())?,
        None => RulesConfig::default(),
    };
    Ok(RuleBook::new(catalog, config))
}

/// Read a character from a JSON file.
fn load_character(path: &Path) -> Result<Character, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let character: Character = serde_json::from_str(&json)
        .map_err(|e| format!("invalid character {}: {e}", path.display()))?;
    tracing::debug!(name = %character.name, path = %path.display(), "character loaded");
    Ok(character)
}

/// "—" for a missing value.
fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}
