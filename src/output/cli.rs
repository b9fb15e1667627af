use crate::model::ScanResult;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct PackageRow {
    #[tabled(rename = "Type")]
    ecosystem: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "PURL")]
    purl: String,
    #[tabled(rename = "CPEs")]
    cpes: usize,
    #[tabled(rename = "Licenses")]
    licenses: String,
}

pub fn print_cli_table(result: &ScanResult) -> Result<()> {
    println!();

    if let Some(image) = &result.image {
        let tags: Vec<&str> = image
            .manifest
            .iter()
            .flat_map(|m| m.repo_tags.iter().map(String::as_str))
            .collect();
        println!(
            "Image: {} ({}/{})",
            if tags.is_empty() { "-".to_string() } else { tags.join(", ") },
            or_dash(&image.config.os),
            or_dash(&image.config.architecture),
        );
        println!();
    }

    if result.packages.is_empty() {
        println!("No packages found.");
    } else {
        println!("Found {} packages:", result.packages.len());
        println!();

        let rows: Vec<PackageRow> = result
            .packages
            .iter()
            .map(|p| PackageRow {
                ecosystem: p.ecosystem.display_name().to_string(),
                name: truncate(&p.name, 40),
                version: truncate(&p.version, 30),
                purl: truncate(&p.purl, 60),
                cpes: p.cpes.len(),
                licenses: if p.licenses.is_empty() {
                    "-".to_string()
                } else {
                    truncate(&p.licenses.join(", "), 30)
                },
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    if !result.errors.is_empty() {
        println!();
        println!("{} errors while scanning:", result.errors.len());
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    println!();
    print_summary(result);

    Ok(())
}

fn print_summary(result: &ScanResult) {
    println!("Summary:");
    println!("  Total packages: {}", result.packages.len());

    let counts = result.counts();
    if counts.len() > 1 {
        let by_type: Vec<String> = counts
            .iter()
            .map(|(e, c)| format!("{} {}", c, e.display_name()))
            .collect();
        println!("  By type: {}", by_type.join(", "));
    }

    let total_cpes: usize = result.packages.iter().map(|p| p.cpes.len()).sum();
    println!("  CPE candidates: {}", total_cpes);
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
