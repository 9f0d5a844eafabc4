//! Implementation of the `craftvista categories` command.

use serde::Serialize;

use craftvista_core::domain::Category;

use crate::{
    cli::{CategoriesArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct CategoryRow {
    slug: &'static str,
    name: &'static str,
    icon: &'static str,
}

fn rows() -> Vec<CategoryRow> {
    Category::ALL
        .iter()
        .map(|c| CategoryRow {
            slug: c.as_str(),
            name: c.display_name(),
            icon: c.icon(),
        })
        .collect()
}

fn to_csv(rows: &[CategoryRow]) -> String {
    let mut csv = String::from("slug,name\n");
    for row in rows {
        csv.push_str(&format!("{},\"{}\"\n", row.slug, row.name));
    }
    csv
}

/// Machine formats ignore `--quiet`; they are the command's only output.
pub fn execute(args: CategoriesArgs, output: OutputManager) -> CliResult<()> {
    let rows = rows();

    match args.format {
        ListFormat::Table => {
            output.header("Craft categories:")?;
            for row in &rows {
                output.print(&format!("  {}  {:<10} {}", row.icon, row.slug, row.name))?;
            }
        }
        ListFormat::Json => output.json(&rows)?,
        ListFormat::List => {
            for row in &rows {
                println!("{}", row.slug);
            }
        }
        ListFormat::Csv => print!("{}", to_csv(&rows)),
    }

    Ok(())
}
