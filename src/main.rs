// Entry point and high-level CLI flow.
//
// Default mode loads the CSV once, applies the year/severity selection given
// on the command line, prints every dashboard section and exports the tables.
// `--interactive` keeps the dataset loaded and recomputes the dashboard each
// time the selection changes from the menu.
use accident_dashboard::config::{
    DashboardConfig, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR, DEFAULT_PREVIEW_ROWS,
};
use accident_dashboard::output::{export_dashboard, print_dashboard};
use accident_dashboard::util::format_int;
use accident_dashboard::{load_dataset, Dataset, FilterSelection, LoadReport, Session};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "accident_dashboard", version)]
#[command(about = "Descriptive analytics over a traffic accident attribute table", long_about = None)]
struct Cli {
    /// CSV export of the accident attribute table
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory for exported section tables and JSON summaries
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Year to include (repeatable); all observed years when omitted
    #[arg(short = 'y', long = "year", value_name = "YEAR")]
    years: Vec<i32>,

    /// Severity to include (repeatable); all observed severities when omitted
    #[arg(short = 's', long = "severity", value_name = "SEVERITY")]
    severities: Vec<String>,

    /// Rows shown per section in the console preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview_rows: usize,

    /// Print the preview only, without writing export files
    #[arg(long, default_value_t = false)]
    no_export: bool,

    /// Choose filters from a menu and regenerate on demand
    #[arg(long, default_value_t = false)]
    interactive: bool,

    /// Debug-level logging (RUST_LOG takes precedence when set)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> DashboardConfig {
        DashboardConfig {
            input_path: self.input.clone(),
            output_dir: self.output_dir.clone(),
            preview_rows: self.preview_rows,
            export: !self.no_export,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Print `prompt` and read one trimmed line; `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Ask whether to go back to the menu after generating the dashboard.
fn prompt_back_to_menu() -> bool {
    loop {
        let Some(resp) = read_line("Back to menu (Y/N): ") else {
            return false;
        };
        match resp.to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn print_load_report(config: &DashboardConfig, report: &LoadReport) {
    println!(
        "Processing dataset... ({} rows loaded from {})",
        format_int(report.loaded_rows),
        config.input_path.display()
    );
    if report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to parse errors.",
            format_int(report.parse_errors)
        );
    }
    if report.lossy_rows > 0 {
        println!(
            "Note: {} rows contained text that is not UTF-8; those characters show as '\u{FFFD}'.",
            format_int(report.lossy_rows)
        );
    }
    if report.null_dates > 0 {
        println!(
            "Note: {} rows have an unreadable Accident Date and are excluded by the year filter.",
            format_int(report.null_dates)
        );
    }
    println!("Fields in data: {}\n", report.headers.join(" | "));
}

fn load(config: &DashboardConfig) -> Result<Arc<Dataset>> {
    let (dataset, report) = load_dataset(&config.input_path)
        .with_context(|| format!("failed to load {}", config.input_path.display()))?;
    print_load_report(config, &report);
    Ok(Arc::new(dataset))
}

fn generate(session: &Session, config: &DashboardConfig) -> Result<()> {
    let dashboard = session.render();
    println!("ACCIDENT DATA ANALYTICS DASHBOARD\n");
    print_dashboard(&dashboard, config.preview_rows);
    if config.export {
        export_dashboard(&config.output_dir, &dashboard)
            .with_context(|| format!("failed to export to {}", config.output_dir.display()))?;
        println!(
            "(Full tables exported to {})\n",
            config.output_dir.display()
        );
    }
    Ok(())
}

fn choose_years(session: &mut Session) {
    let observed = session.dataset().observed_years();
    let listed: Vec<String> = observed.iter().map(|y| y.to_string()).collect();
    println!("Available years: {}", listed.join(", "));
    let Some(input) = read_line("Years (comma separated, blank for all): ") else {
        return;
    };
    let mut years = Vec::new();
    for item in split_list(&input) {
        match item.parse::<i32>() {
            Ok(y) => years.push(y),
            Err(_) => {
                println!("Invalid year '{}'.\n", item);
                return;
            }
        }
    }
    match FilterSelection::from_requested(session.dataset(), &years, &[]) {
        Ok(sel) => {
            session.set_years(sel.years);
            println!();
        }
        Err(e) => println!("{}\n", e),
    }
}

fn choose_severities(session: &mut Session) {
    let Some(observed) = session.dataset().observed_severities() else {
        println!("Column 'Accident_Severity' not found in the dataset.\n");
        return;
    };
    let listed: Vec<&str> = observed.iter().map(String::as_str).collect();
    println!("Available severities: {}", listed.join(", "));
    let Some(input) = read_line("Severities (comma separated, blank for all): ") else {
        return;
    };
    let requested = split_list(&input);
    match FilterSelection::from_requested(session.dataset(), &[], &requested) {
        Ok(sel) => {
            session.set_severities(sel.severities.unwrap_or_default());
            println!();
        }
        Err(e) => println!("{}\n", e),
    }
}

fn run_interactive(config: &DashboardConfig) -> Result<()> {
    // Loaded once; each session only swaps its selection.
    let mut session: Option<Session> = None;
    loop {
        println!("Accident Dashboard");
        println!("[1] Load the file");
        println!("[2] Select years");
        println!("[3] Select severities");
        println!("[4] Generate dashboard");
        println!("[5] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            return Ok(());
        };
        match choice.as_str() {
            "1" => match load(config) {
                Ok(dataset) => session = Some(Session::new(dataset)),
                Err(e) => eprintln!("Failed to load file: {:#}\n", e),
            },
            "2" | "3" | "4" => {
                let Some(s) = session.as_mut() else {
                    println!("Error: No data loaded. Please load the file first (option 1).\n");
                    continue;
                };
                match choice.as_str() {
                    "2" => choose_years(s),
                    "3" => choose_severities(s),
                    _ => {
                        if let Err(e) = generate(s, config) {
                            eprintln!("Write error: {:#}\n", e);
                        }
                        if !prompt_back_to_menu() {
                            println!("Exiting the program.");
                            return Ok(());
                        }
                    }
                }
            }
            "5" => {
                println!("Exiting the program.");
                return Ok(());
            }
            _ => println!("Invalid choice. Please enter 1 to 5.\n"),
        }
    }
}

fn run_once(cli: &Cli, config: &DashboardConfig) -> Result<()> {
    let dataset = load(config)?;
    let selection = FilterSelection::from_requested(&dataset, &cli.years, &cli.severities)?;
    let session = Session::with_selection(dataset, selection);
    generate(&session, config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config();
    config.validate()?;

    if cli.interactive {
        run_interactive(&config)
    } else {
        run_once(&cli, &config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(split_list(" 2020, ,2021 "), vec!["2020", "2021"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["accident_dashboard"]);
        let config = cli.config();
        assert_eq!(config, DashboardConfig::default());
        assert!(cli.years.is_empty());
    }

    #[test]
    fn test_cli_repeatable_filters() {
        let cli = Cli::parse_from([
            "accident_dashboard",
            "-y",
            "2020",
            "--year",
            "2021",
            "-s",
            "Fatal",
            "--no-export",
        ]);
        assert_eq!(cli.years, vec![2020, 2021]);
        assert_eq!(cli.severities, vec!["Fatal".to_string()]);
        assert!(!cli.config().export);
    }
}
