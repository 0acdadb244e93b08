use crate::model::{DiscoveryReport, IndexReport, VersionConstraint};
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ModuleRow {
    #[tabled(rename = "Module")]
    module: String,
    #[tabled(rename = "Advisories")]
    advisories: String,
    #[tabled(rename = "Versions")]
    versions: String,
}

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "File")]
    path: String,
}

pub fn print_index_table(report: &IndexReport) -> Result<()> {
    println!();
    println!(
        "Index built at: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    if report.modules.is_empty() {
        println!("No advisories found in {}.", report.source);
    } else {
        println!(
            "Indexed {} advisories across {} modules:",
            report.advisory_count,
            report.modules.len()
        );
        println!();

        let rows: Vec<ModuleRow> = report
            .modules
            .iter()
            .map(|(module, entries)| ModuleRow {
                module: truncate(module, 50),
                advisories: entries
                    .iter()
                    .map(|e| e.identifier.as_str())
                    .collect::<Vec<_>>()
                    .join("\n"),
                versions: entries
                    .iter()
                    .map(|e| format_versions(&e.version_constraints))
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    print_skipped(report.diagnostics.len());
    Ok(())
}

pub fn print_discovery_table(report: &DiscoveryReport) -> Result<()> {
    println!();
    if report.files.is_empty() {
        println!("No matching files under {}.", report.root.display());
    } else {
        println!(
            "Found {} files under {}:",
            report.files.len(),
            report.root.display()
        );
        println!();

        let rows: Vec<FileRow> = report
            .files
            .iter()
            .map(|p| FileRow {
                path: p.display().to_string(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }

    print_skipped(report.diagnostics.len());
    Ok(())
}

fn print_skipped(count: usize) {
    if count > 0 {
        println!();
        println!("Skipped {} entries (see diagnostics above).", count);
    }
}

/// Renders each constraint as `fixed=v1.0.3 introduced=v1.0.0`, joined by `; `.
fn format_versions(constraints: &[VersionConstraint]) -> String {
    if constraints.is_empty() {
        return "-".to_string();
    }

    constraints
        .iter()
        .map(|c| {
            c.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_versions() {
        let mut first = VersionConstraint::new();
        first.insert("introduced".to_string(), "v1.0.0".to_string());
        first.insert("fixed".to_string(), "v1.0.3".to_string());
        let mut second = VersionConstraint::new();
        second.insert("fixed".to_string(), "v2.1.0".to_string());

        assert_eq!(
            format_versions(&[first, second]),
            "fixed=v1.0.3 introduced=v1.0.0; fixed=v2.1.0"
        );
        assert_eq!(format_versions(&[]), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("golang.org/x/net", 50), "golang.org/x/net");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
