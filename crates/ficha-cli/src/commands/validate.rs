use std::path::PathBuf;

use colored::Colorize;
use ficha_rules::{RuleBook, ValidationIssue, validate_catalog, validate_character};

pub fn run(book: &RuleBook, files: &[PathBuf]) -> Result<(), String> {
    let mut issues = validate_catalog(book.catalog());
    for file in files {
        let character = super::load_character(file)?;
        issues.extend(validate_character(book.catalog(), &character));
    }

    for issue in &issues {
        print_issue(issue);
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        return Err(format!(
            "{errors} error{}, {warnings} warning{}",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
        ));
    }

    println!(
        "  All checks passed ({} character{}, {warnings} warning{}).",
        files.len(),
        if files.len() == 1 { "" } else { "s" },
        if warnings == 1 { "" } else { "s" },
    );
    Ok(())
}

fn print_issue(issue: &ValidationIssue) {
    let level = if issue.is_error {
        "error".red().bold()
    } else {
        "warning".yellow().bold()
    };
    println!("  {level}: {}: {}", issue.entity, issue.message);
}
