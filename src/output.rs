use crate::error::{Error, Result};
use crate::reports::{Dashboard, DashboardSection, SectionContent};
use crate::util::format_int;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_parsing(&file, "failed to create file", Some(e)))?;
    for r in rows {
        wtr.serialize(r)
            .map_err(|e| Error::csv_parsing(&file, "failed to write row", Some(e)))?;
    }
    wtr.flush()
        .map_err(|e| Error::io(format!("failed to flush {}", file), e))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;
    Ok(())
}

/// Write a header line followed by plain string rows.
fn write_records(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let file = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_parsing(&file, "failed to create file", Some(e)))?;
    wtr.write_record(header)
        .map_err(|e| Error::csv_parsing(&file, "failed to write header", Some(e)))?;
    for row in rows {
        wtr.write_record(row)
            .map_err(|e| Error::csv_parsing(&file, "failed to write row", Some(e)))?;
    }
    wtr.flush()
        .map_err(|e| Error::io(format!("failed to flush {}", file), e))?;
    Ok(())
}

/// Frequency export with the original `[<label>, Count]` header.
fn write_frequency_csv(path: &Path, section: &DashboardSection) -> Result<()> {
    let SectionContent::Frequency(table) = &section.content else {
        return Ok(());
    };
    let rows: Vec<Vec<String>> = table
        .rows()
        .into_iter()
        .map(|row| vec![row.value, row.count.to_string()])
        .collect();
    write_records(path, &[section.label, "Count"], &rows)
}

/// Write one CSV per computed section plus `summary.json` and `dashboard.json`.
///
/// Returns the paths written, in section order.
pub fn export_dashboard(dir: &Path, dashboard: &Dashboard) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .map_err(|e| Error::io(format!("failed to create {}", dir.display()), e))?;

    let mut written = Vec::new();
    for section in &dashboard.sections {
        let path = dir.join(format!("{}.csv", section.key));
        match &section.content {
            SectionContent::Monthly(series) => write_csv(&path, &series.rows())?,
            SectionContent::MonthlyBySeverity(series) => write_csv(&path, &series.rows())?,
            SectionContent::Frequency(_) => write_frequency_csv(&path, section)?,
            SectionContent::Skipped { .. } => continue,
        }
        written.push(path);
    }

    let summary = dir.join("summary.json");
    write_json(&summary, &dashboard.summary)?;
    written.push(summary);

    let full = dir.join("dashboard.json");
    write_json(&full, dashboard)?;
    written.push(full);

    info!(files = written.len(), dir = %dir.display(), "Exported dashboard");
    Ok(written)
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);
    if rows.len() > max_rows {
        println!("... {} more rows", format_int(rows.len() - max_rows));
    }
    println!();
}

pub fn print_dashboard(dashboard: &Dashboard, max_rows: usize) {
    for notice in &dashboard.notices {
        println!("Note: {}", notice);
    }
    if !dashboard.notices.is_empty() {
        println!();
    }

    let s = &dashboard.summary;
    println!("Summary Metrics\n");
    println!("Total Accidents:         {}", format_int(s.total_accidents));
    println!("Total Casualties:        {}", format_int(s.total_casualties));
    println!("Total Vehicles Involved: {}", format_int(s.total_vehicles));
    println!("Unique Districts:        {}\n", format_int(s.unique_districts));

    let mut heading = "";
    for section in &dashboard.sections {
        if section.heading != heading {
            heading = section.heading;
            println!("== {} ==\n", heading);
        }
        println!("{}", section.title);
        println!("({})\n", section.description);
        match &section.content {
            SectionContent::Monthly(series) => preview_table_rows(&series.rows(), max_rows),
            SectionContent::MonthlyBySeverity(series) => {
                preview_table_rows(&series.rows(), max_rows)
            }
            SectionContent::Frequency(table) => preview_table_rows(&table.rows(), max_rows),
            SectionContent::Skipped { missing_column } => {
                println!("Skipped: column '{}' not found in the dataset.\n", missing_column)
            }
        }
    }
}
