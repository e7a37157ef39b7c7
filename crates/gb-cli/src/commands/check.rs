use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use gb_story::Language;

pub fn run(lang: Language, pages: Option<&Path>) -> Result<(), String> {
    let repo = super::load_pages(lang, pages)?;
    let stats = repo.stats();

    let source = pages.map_or_else(|| format!("bundled story ({lang})"), |p| p.display().to_string());
    println!("  {} {source}", "Checked".bold());

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Item", "Count"]);
    for (label, count) in [
        ("Pages", stats.pages),
        ("Terminal pages", stats.terminal_pages),
        ("Choices", stats.choices),
        ("Jumps", stats.gotos),
        ("Skill rolls", stats.skill_rolls),
        ("Characteristic rolls", stats.characteristic_rolls),
        ("Luck rolls", stats.luck_rolls),
        ("Opposed rolls", stats.opposed_rolls),
        ("Occupation conditionals", stats.conditionals),
        ("Occupation choices", stats.set_occupations),
        ("With effects", stats.with_effects),
        ("With requirements", stats.with_requires),
    ] {
        table.add_row(vec![label.to_string(), count.to_string()]);
    }
    println!("{table}");

    let report = repo.report();
    if report.is_clean() {
        println!("  {}", "All checks passed.".green());
    } else {
        println!(
            "  {}",
            format!("{} content issue(s):", report.len()).yellow()
        );
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}
