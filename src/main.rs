use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Cell, Table as ComfyTable};
use rowbind::{BindError, LogSink, Logic, Provider, Row, RowProjector, RowbindConfig, Table};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// rowbind - project table rows into bind parameters and predicates
#[derive(Debug, Parser)]
#[command(name = "rowbind")]
#[command(about = "Infer keys and build provider-tagged parameters from JSON tables", long_about = None)]
struct Args {
    /// Settings file (default: /etc/rowbind/rowbind.toml or ./rowbind.toml)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bind parameters for one row
    Bind {
        /// JSON table document
        input: PathBuf,
        /// Row index
        #[arg(short, long, default_value_t = 0)]
        row: usize,
        /// SQLite, SqlCe, OleDb (Excel, Access) or SqlServer
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Equality predicate for one row
    Predicate {
        input: PathBuf,
        #[arg(short, long, default_value_t = 0)]
        row: usize,
        /// AND or OR
        #[arg(short, long)]
        logic: Option<String>,
    },
    /// Primary keys per row and column-0 keys across the table
    Keys { input: PathBuf },
    /// Vocabulary role of every column
    Classify { input: PathBuf },
}

#[derive(Serialize)]
struct KeyReport {
    table: String,
    row_keys: Vec<Option<rowbind::PrimaryKey>>,
    column_zero_keys: Vec<i64>,
}

#[derive(Serialize)]
struct ColumnReport {
    column: String,
    role: rowbind::ColumnRole,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), BindError> {
    let config = RowbindConfig::load(args.config.as_deref())?;
    let projector = config.projector(Arc::new(LogSink))?;
    let binder = config.binder(Arc::new(LogSink))?;

    match &args.command {
        Command::Bind { input, row, provider } => {
            let table = load_table(input)?;
            let provider: Provider = match provider {
                Some(tag) => tag.parse()?,
                None => config.default_provider,
            };
            let map = projector.try_to_field_map(select_row(&table, *row)?)?;
            let params = binder.bind_with(&map, provider);
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&params)?),
                OutputFormat::Table => {
                    let rows = params.iter().enumerate().map(|(idx, p)| {
                        vec![
                            (idx + 1).to_string(),
                            p.placeholder(),
                            p.source_column.clone(),
                            p.value.to_string(),
                        ]
                    });
                    print_table(&["#", "Marker", "Column", "Value"], rows);
                    println!("({} parameters, {provider})", params.len());
                }
            }
        }
        Command::Predicate { input, row, logic } => {
            let table = load_table(input)?;
            let logic: Logic = match logic {
                Some(tag) => tag.parse()?,
                None => config.default_logic,
            };
            let map = projector.try_to_field_map(select_row(&table, *row)?)?;
            let predicate = binder.to_predicate(&map, logic);
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&predicate)?),
                OutputFormat::Table => println!("WHERE {predicate}"),
            }
        }
        Command::Keys { input } => {
            let table = load_table(input)?;
            let report = key_report(&projector, &table)?;
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Table => {
                    let rows = report.row_keys.iter().enumerate().map(|(idx, key)| match key {
                        Some(k) => vec![idx.to_string(), k.column.clone(), k.value.to_string()],
                        None => vec![idx.to_string(), "-".to_string(), "-".to_string()],
                    });
                    print_table(&["Row", "Key column", "Key"], rows);
                    println!("Column 0 keys: {:?}", report.column_zero_keys);
                }
            }
        }
        Command::Classify { input } => {
            let table = load_table(input)?;
            let columns: Vec<ColumnReport> = table
                .columns()
                .iter()
                .map(|name| ColumnReport {
                    column: name.clone(),
                    role: projector.vocabulary().classify(name),
                })
                .collect();
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&columns)?),
                OutputFormat::Table => {
                    let rows = columns
                        .iter()
                        .map(|c| vec![c.column.clone(), c.role.to_string()]);
                    print_table(&["Column", "Role"], rows);
                    println!(
                        "primary key: {}, numeric: {}",
                        projector.table_has_primary_key(&table),
                        projector.table_has_numeric_column(&table)
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_table(path: &Path) -> Result<Table, BindError> {
    let text = std::fs::read_to_string(path)?;
    Table::from_json(&text)
}

fn select_row(table: &Table, idx: usize) -> Result<&Row, BindError> {
    table.rows().get(idx).ok_or(BindError::RowOutOfRange {
        index: idx,
        rows: table.rows().len(),
    })
}

fn key_report(projector: &RowProjector, table: &Table) -> Result<KeyReport, BindError> {
    let mut row_keys = Vec::with_capacity(table.rows().len());
    for row in table.rows() {
        let map = projector.try_to_field_map(row)?;
        row_keys.push(projector.try_primary_key(&map)?);
    }
    let column_zero_keys = if table.rows().is_empty() {
        Vec::new()
    } else {
        projector.try_table_primary_key_values(table)?
    };
    Ok(KeyReport {
        table: table.name.clone(),
        row_keys,
        column_zero_keys,
    })
}

fn print_table(header: &[&str], rows: impl Iterator<Item = Vec<String>>) {
    let mut table = ComfyTable::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header.iter().map(|h| Cell::new(h)));
    for row in rows {
        table.add_row(row.iter().map(|c| Cell::new(c)));
    }
    println!("{table}");
}
