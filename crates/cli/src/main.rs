//! # scrubtable-cli
//!
//! Command-line interface for interactive table cleaning.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use scrubtable_clean::{column_stats, AnalysisReport, CaseMode, Severity};
use scrubtable_session::{Action, Session};
use scrubtable_table::Table;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// scrub - clean tabular data from the command line
#[derive(Parser)]
#[command(name = "scrub")]
#[command(author, version, about = "Clean CSV, JSON and Excel data", long_about = None)]
struct Cli {
    /// Data file to load (.csv, .json, .xlsx)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Select columns before applying operations (comma-separated)
    #[arg(short = 's', long = "select", value_name = "COLUMNS")]
    select: Option<String>,

    /// Apply a cleaning command (repeatable, same syntax as the REPL)
    #[arg(short = 'a', long = "apply", value_name = "COMMAND")]
    apply: Vec<String>,

    /// Write the cleaned table to this file (.csv, .json, .xlsx)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Start REPL mode
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// A parsed REPL / batch command.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Help,
    Open(PathBuf),
    Show(Option<usize>),
    Analyze,
    Stats(String),
    Select(Vec<String>),
    ClearSelection,
    Undo,
    Redo,
    Log,
    Search(String),
    Export(PathBuf),
    Reset,
    Quit,
    Action(Action),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let mut session = match &cli.file {
        Some(path) => load_session(path)?,
        None => Session::default(),
    };

    if let Some(columns) = &cli.select {
        let columns: Vec<String> = columns.split(',').map(|c| c.trim().to_string()).collect();
        session.set_selection(columns)?;
    }

    if cli.interactive {
        return run_repl(&mut session);
    }

    if cli.file.is_none() {
        // No arguments - show help
        Cli::parse_from(["scrub", "--help"]);
        return Ok(());
    }

    for raw in &cli.apply {
        let command = parse_command(raw).map_err(|e| anyhow::anyhow!(e))?;
        match command {
            Command::Quit => break,
            other => {
                execute(&mut session, other)?;
            }
        }
    }

    if let Some(output) = &cli.output {
        export(&mut session, output)?;
        println!("Wrote {}", output.display());
    } else if cli.apply.is_empty() {
        // Load-and-report mode: print the quality analysis
        if let Some(report) = session.analysis() {
            print_analysis(report);
        }
    } else {
        print_table(&session, None);
    }

    Ok(())
}

/// Load a table by file extension and open a session named after the file.
fn load_session(path: &Path) -> Result<Session> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());

    let (table, headers) = match extension(path).as_deref() {
        Some("csv") => Table::from_csv(path),
        Some("json") => Table::from_json(path),
        Some("xlsx") => Table::from_xlsx(path),
        _ => bail!(
            "Unsupported file type: {} (expected .csv, .json or .xlsx)",
            path.display()
        ),
    }
    .with_context(|| format!("Failed to load {}", path.display()))?;

    println!(
        "Loaded {} ({} rows, {} columns)",
        path.display(),
        table.row_count(),
        headers.len()
    );
    Ok(Session::load(&name, table, headers))
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// Run the REPL.
fn run_repl(session: &mut Session) -> Result<()> {
    println!(
        "{} {} - Interactive Mode",
        "scrubtable".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "Type {} for commands, {} to exit\n",
        "help".yellow(),
        "quit".yellow()
    );

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs_history_path();

    // Load history if available
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = "scrub> ".green().bold().to_string();

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match parse_command(line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = execute(session, command) {
                            println!("{} {e}", "Error:".red().bold());
                        }
                    }
                    Err(e) => {
                        println!("{} {e}", "Error:".red().bold());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => {
                println!("{} {e}", "Error:".red().bold());
                break;
            }
        }
    }

    // Save history
    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Get the history file path.
fn dirs_history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|mut p| {
        p.push("scrubtable");
        let _ = std::fs::create_dir_all(&p);
        p.push("history.txt");
        p
    })
}

/// Parse one line into a command. Shared by the REPL and `--apply`.
fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err("Empty command".to_string());
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };
    let word = word.to_lowercase();
    let mut parts = rest.split_whitespace();

    let command = match word.as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "open" | "load" => {
            if rest.is_empty() {
                return Err("Usage: open <file>".to_string());
            }
            Command::Open(PathBuf::from(rest))
        }
        "show" => {
            let limit = match parts.next() {
                Some(n) => Some(
                    n.parse::<usize>()
                        .map_err(|_| format!("Not a row count: {n}"))?,
                ),
                None => None,
            };
            Command::Show(limit)
        }
        "analyze" => Command::Analyze,
        "stats" => {
            if rest.is_empty() {
                return Err("Usage: stats <column>".to_string());
            }
            Command::Stats(rest.to_string())
        }
        "select" => {
            let columns: Vec<String> = rest
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            Command::Select(columns)
        }
        "deselect" | "clear" => Command::ClearSelection,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "log" => Command::Log,
        "search" => Command::Search(rest.to_string()),
        "export" => {
            if rest.is_empty() {
                return Err("Usage: export <file>".to_string());
            }
            Command::Export(PathBuf::from(rest))
        }
        "reset" => Command::Reset,

        "dedupe" | "dedup" => Command::Action(Action::RemoveDuplicates),
        "trim" => Command::Action(Action::TrimSpaces),
        "case" => {
            let mode = match parts.next() {
                Some("upper") => CaseMode::Upper,
                Some("lower") => CaseMode::Lower,
                Some("proper") => CaseMode::Proper,
                _ => return Err("Usage: case <upper|lower|proper>".to_string()),
            };
            Command::Action(Action::ChangeCase(mode))
        }
        "dropmissing" => Command::Action(Action::RemoveMissingRows),
        "fill" => {
            if rest.is_empty() {
                return Err("Usage: fill <value>".to_string());
            }
            Command::Action(Action::FillMissing {
                value: rest.to_string(),
            })
        }
        "replace" => {
            let find = parts.next().ok_or("Usage: replace <find> <replace>")?;
            let replace = parts.next().unwrap_or("");
            Command::Action(Action::FindReplace {
                find: find.to_string(),
                replace: replace.to_string(),
            })
        }
        "strip" => Command::Action(Action::RemoveSpecialChars),
        "numbers" => Command::Action(Action::ExtractNumbers),
        "text" => Command::Action(Action::ExtractText),
        "split" => {
            if rest.is_empty() {
                return Err("Usage: split <delimiter>".to_string());
            }
            Command::Action(Action::SplitColumn {
                delimiter: rest.to_string(),
            })
        }
        "merge" => Command::Action(Action::MergeColumns {
            separator: if rest.is_empty() {
                " ".to_string()
            } else {
                rest.to_string()
            },
        }),
        "dates" => Command::Action(Action::FormatDates),
        "outliers" => Command::Action(Action::RemoveOutliers),
        "emails" => Command::Action(Action::ValidateEmails),
        "phones" => Command::Action(Action::FormatPhoneNumbers),
        "sort" => {
            if rest.is_empty() {
                return Err("Usage: sort <column>".to_string());
            }
            Command::Action(Action::Sort {
                column: rest.to_string(),
            })
        }

        other => return Err(format!("Unknown command: {other} (try 'help')")),
    };

    Ok(command)
}

/// Execute one command against the session.
fn execute(session: &mut Session, command: Command) -> Result<()> {
    match command {
        Command::Help => print_help(),
        Command::Quit => {}
        Command::Open(path) => {
            *session = load_session(&path)?;
        }
        Command::Show(limit) => print_table(session, limit),
        Command::Analyze => {
            let report = session.analyze()?.clone();
            print_analysis(&report);
        }
        Command::Stats(column) => {
            print_stats(session, &column)?;
        }
        Command::Select(columns) => {
            if columns.is_empty() {
                let selected = session.selected();
                if selected.is_empty() {
                    println!("No columns selected");
                } else {
                    println!("Selected: {}", selected.join(", "));
                }
            } else {
                session.set_selection(columns)?;
                println!("Selected: {}", session.selected().join(", "));
            }
        }
        Command::ClearSelection => {
            session.clear_selection();
            println!("Selection cleared");
        }
        Command::Undo => {
            if session.undo() {
                println!("Undid last change");
            } else {
                println!("Nothing to undo");
            }
        }
        Command::Redo => {
            if session.redo() {
                println!("Redid change");
            } else {
                println!("Nothing to redo");
            }
        }
        Command::Log => {
            if session.log().is_empty() {
                println!("Log is empty");
            }
            for entry in session.log() {
                println!("{entry}");
            }
        }
        Command::Search(query) => {
            session.view_mut().search_query = query;
            print_table(session, None);
        }
        Command::Export(path) => {
            export(session, &path)?;
            println!("Wrote {}", path.display());
        }
        Command::Reset => {
            session.reset();
            println!("Session reset");
        }
        Command::Action(action) => {
            let message = session.apply(action)?;
            println!("{}", message.green());
        }
    }
    Ok(())
}

/// Export the current table, picking the format from the file extension.
fn export(session: &mut Session, path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "exporting");
    match extension(path).as_deref() {
        Some("csv") => session.export_csv(path)?,
        Some("json") => session.export_json(path)?,
        Some("xlsx") => session.export_xlsx(path)?,
        _ => bail!(
            "Unsupported export type: {} (expected .csv, .json or .xlsx)",
            path.display()
        ),
    }
    Ok(())
}

/// Print the current table (search-filtered), padded to column widths.
fn print_table(session: &Session, limit: Option<usize>) {
    let headers = session.headers();
    if headers.is_empty() {
        println!("(no dataset loaded)");
        return;
    }

    let rows = session.filtered_rows();
    let shown = limit.unwrap_or(rows.len()).min(rows.len());

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &rows[..shown] {
        for (i, header) in headers.iter().enumerate() {
            let cell = row.get(header).map(|c| c.as_str()).unwrap_or_default();
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(widths.iter().copied())
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    println!("{}", header_line.join("  ").bold());

    for row in &rows[..shown] {
        let line: Vec<String> = headers
            .iter()
            .zip(widths.iter().copied())
            .map(|(h, w)| {
                let cell = row.get(h).map(|c| c.as_str()).unwrap_or_default();
                format!("{cell:<w$}")
            })
            .collect();
        println!("{}", line.join("  "));
    }

    if shown < rows.len() {
        println!("... {} more rows", rows.len() - shown);
    }
    println!("({} rows)", rows.len());
}

/// Print the quality analysis report.
fn print_analysis(report: &AnalysisReport) {
    let score = report.quality_score;
    let score_text = format!("{score}/100");
    let colored_score = if score >= 80 {
        score_text.green().bold()
    } else if score >= 50 {
        score_text.yellow().bold()
    } else {
        score_text.red().bold()
    };
    println!("{} {}", "Quality score:".cyan().bold(), colored_score);
    println!("{} rows, {} columns", report.total_rows, report.total_columns);

    if report.issues.is_empty() {
        println!("{}", "No issues found".green());
        return;
    }

    for issue in &report.issues {
        let severity = match issue.severity {
            Severity::Critical => "critical".red().bold(),
            Severity::High => "high".yellow().bold(),
            Severity::Medium => "medium".blue().bold(),
        };
        println!("  [{severity}] {}: {}", issue.title, issue.description);
    }
}

/// Print per-column statistics.
fn print_stats(session: &Session, column: &str) -> Result<()> {
    let Some(table) = session.current() else {
        bail!("No dataset is loaded");
    };
    if !session.headers().iter().any(|h| h == column) {
        bail!("Unknown column: {column}");
    }

    let stats = column_stats(table, column);
    println!("{}", column.cyan().bold());
    println!("  count:  {}", stats.count);
    println!("  unique: {}", stats.unique);
    match (stats.min, stats.max, stats.avg) {
        (Some(min), Some(max), Some(avg)) => {
            println!("  min:    {min}");
            println!("  max:    {max}");
            println!("  avg:    {avg}");
        }
        _ => println!("  (no numeric values)"),
    }
    Ok(())
}

/// Print REPL help.
fn print_help() {
    println!("{}", "scrubtable commands:".cyan().bold());
    println!("  {}            Load a data file", "open <file>".yellow());
    println!("  {}              Show the table (optionally first N rows)", "show [n]".yellow());
    println!("  {}               Run the data quality analysis", "analyze".yellow());
    println!("  {}        Show statistics for one column", "stats <column>".yellow());
    println!("  {}     Select columns (comma-separated)", "select <a,b,...>".yellow());
    println!("  {}              Clear the column selection", "deselect".yellow());
    println!("  {}          Filter the display", "search <text>".yellow());
    println!();
    println!("{}", "Cleaning operations:".cyan().bold());
    println!("  {}                Remove duplicate rows", "dedupe".yellow());
    println!("  {}                  Trim and collapse whitespace", "trim".yellow());
    println!("  {}  Change case in selected columns", "case <upper|lower|proper>".yellow());
    println!("  {}           Drop rows missing selected columns", "dropmissing".yellow());
    println!("  {}          Fill missing values", "fill <value>".yellow());
    println!("  {}  Find and replace text", "replace <find> <replace>".yellow());
    println!("  {}                 Remove special characters", "strip".yellow());
    println!("  {}               Keep only digits", "numbers".yellow());
    println!("  {}                  Drop digits, keep text", "text".yellow());
    println!("  {}         Split the selected column", "split <delim>".yellow());
    println!("  {}           Merge selected columns", "merge [sep]".yellow());
    println!("  {}                 Normalize dates to YYYY-MM-DD", "dates".yellow());
    println!("  {}              Blank statistical outliers", "outliers".yellow());
    println!("  {}                Count invalid emails", "emails".yellow());
    println!("  {}                Format US phone numbers", "phones".yellow());
    println!("  {}         Sort by a column (repeat to toggle)", "sort <column>".yellow());
    println!();
    println!("{}", "Session:".cyan().bold());
    println!("  {}  {}  {}      Undo / redo / show the log", "undo".yellow(), "redo".yellow(), "log".yellow());
    println!("  {}         Write csv, json or xlsx", "export <file>".yellow());
    println!("  {}  {}          Reset / leave", "reset".yellow(), "quit".yellow());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
        assert_eq!(parse_command("undo").unwrap(), Command::Undo);
        assert_eq!(parse_command("LOG").unwrap(), Command::Log);
        assert_eq!(parse_command("  trim  ").unwrap(), Command::Action(Action::TrimSpaces));
    }

    #[test]
    fn test_parse_show_limit() {
        assert_eq!(parse_command("show").unwrap(), Command::Show(None));
        assert_eq!(parse_command("show 10").unwrap(), Command::Show(Some(10)));
        assert!(parse_command("show ten").is_err());
    }

    #[test]
    fn test_parse_select_splits_on_commas() {
        assert_eq!(
            parse_command("select name, city").unwrap(),
            Command::Select(vec!["name".to_string(), "city".to_string()])
        );
        assert_eq!(parse_command("select").unwrap(), Command::Select(vec![]));
    }

    #[test]
    fn test_parse_case_modes() {
        assert_eq!(
            parse_command("case upper").unwrap(),
            Command::Action(Action::ChangeCase(CaseMode::Upper))
        );
        assert!(parse_command("case sideways").is_err());
        assert!(parse_command("case").is_err());
    }

    #[test]
    fn test_parse_fill_keeps_spaces() {
        assert_eq!(
            parse_command("fill Not Available").unwrap(),
            Command::Action(Action::FillMissing {
                value: "Not Available".to_string()
            })
        );
        assert!(parse_command("fill").is_err());
    }

    #[test]
    fn test_parse_replace() {
        assert_eq!(
            parse_command("replace foo bar").unwrap(),
            Command::Action(Action::FindReplace {
                find: "foo".to_string(),
                replace: "bar".to_string()
            })
        );
        // empty replacement deletes the match
        assert_eq!(
            parse_command("replace foo").unwrap(),
            Command::Action(Action::FindReplace {
                find: "foo".to_string(),
                replace: String::new()
            })
        );
    }

    #[test]
    fn test_parse_split_and_merge() {
        assert_eq!(
            parse_command("split ,").unwrap(),
            Command::Action(Action::SplitColumn {
                delimiter: ",".to_string()
            })
        );
        assert_eq!(
            parse_command("merge").unwrap(),
            Command::Action(Action::MergeColumns {
                separator: " ".to_string()
            })
        );
        assert_eq!(
            parse_command("merge -").unwrap(),
            Command::Action(Action::MergeColumns {
                separator: "-".to_string()
            })
        );
    }

    #[test]
    fn test_parse_sort_takes_full_column_name() {
        assert_eq!(
            parse_command("sort first name").unwrap(),
            Command::Action(Action::Sort {
                column: "first name".to_string()
            })
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.contains("Unknown command"));
    }

    #[test]
    fn test_parse_export_and_open_need_paths() {
        assert!(parse_command("export").is_err());
        assert!(parse_command("open").is_err());
        assert_eq!(
            parse_command("export out.csv").unwrap(),
            Command::Export(PathBuf::from("out.csv"))
        );
    }
}
