//! folio CLI - compile and run report definitions
//!
//! Usage:
//!   folio compile <definition> [--dialect <dialect>]
//!   folio run <definition> [--db <sqlite>] [--format <format>] [--store]
//!   folio fields <definition>
//!
//! Examples:
//!   folio compile reports/pages.toml --dialect postgres
//!   folio run reports/pages.toml --db site.db --format csv > pages.csv
//!   folio run reports/pages.toml --db site.db --format pdf --store --id 12

use clap::{Parser, Subcommand, ValueEnum};
use folio::config::Settings;
use folio::model::{DefinitionFile, FieldCatalog, ReportFormat, ReportRecord};
use folio::pipeline::{Delivery, ReportArtifact, ReportPipeline};
use folio::source::SqliteSource;
use folio::sql::Dialect;
use folio::storage::FsStorage;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "folio - declarative reports compiled to SQL and rendered as HTML, CSV or PDF")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL a report definition compiles to
    Compile {
        /// Path to the definition file (.toml or .json)
        file: PathBuf,

        /// SQL dialect to generate (defaults to the configured dialect)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Run a report against a SQLite database
    Run {
        /// Path to the definition file (.toml or .json)
        file: PathBuf,

        /// SQLite database (defaults to [source] database)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Output format (defaults to [report] default_format)
        #[arg(short, long)]
        format: Option<FormatArg>,

        /// Save into managed storage instead of writing to stdout
        #[arg(long)]
        store: bool,

        /// Generated report id, used as the storage owner folder
        #[arg(long, default_value_t = 1)]
        id: u64,

        /// Template report id; omitted for previews
        #[arg(long)]
        report_id: Option<u64>,
    },

    /// List the fields a definition's catalog allows
    Fields {
        /// Path to the definition file (.toml or .json)
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Duckdb,
    Postgres,
    Mysql,
    Sqlite,
    Tsql,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Tsql => Dialect::TSql,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Html,
    Csv,
    Pdf,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => ReportFormat::Html,
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Pdf => ReportFormat::Pdf,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output SQL with comments
    Verbose,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compile {
            file,
            dialect,
            output,
        } => cmd_compile(&settings, file, dialect, output),
        Commands::Run {
            file,
            db,
            format,
            store,
            id,
            report_id,
        } => cmd_run(&settings, file, db, format, store, id, report_id),
        Commands::Fields { file } => cmd_fields(file),
    }
}

fn load_definition(file: &Path) -> Option<DefinitionFile> {
    match DefinitionFile::from_path(file) {
        Ok(d) => Some(d),
        Err(e) => {
            eprintln!("Error loading definition '{}': {}", file.display(), e);
            None
        }
    }
}

fn cmd_compile(
    settings: &Settings,
    file: PathBuf,
    dialect: Option<DialectArg>,
    output: OutputFormat,
) -> ExitCode {
    let Some(definition) = load_definition(&file) else {
        return ExitCode::FAILURE;
    };

    let dialect = match dialect {
        Some(d) => d.into(),
        None => match settings.dialect() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let compiled = folio::compile::compile_definition(&definition.catalog, &definition.report);
    let sql = compiled.to_sql(dialect);

    match output {
        OutputFormat::Sql => {
            println!("{}", sql);
        }
        OutputFormat::Verbose => {
            println!("-- folio compiled SQL");
            println!("-- Source: {}", file.display());
            println!("-- Report: {}", definition.report.title);
            println!("-- Dialect: {:?}", dialect);
            println!("-- Conditions: {}", compiled.filter.len());
            println!("-- Order: {}", compiled.order);
            println!();
            println!("{}", sql);
        }
    }
    ExitCode::SUCCESS
}

fn cmd_run(
    settings: &Settings,
    file: PathBuf,
    db: Option<PathBuf>,
    format: Option<FormatArg>,
    store: bool,
    id: u64,
    report_id: Option<u64>,
) -> ExitCode {
    let Some(definition) = load_definition(&file) else {
        return ExitCode::FAILURE;
    };

    let format: ReportFormat = match format {
        Some(f) => f.into(),
        None => match settings.default_format() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let db = match db.map(Ok).or_else(|| settings.database().transpose()) {
        Some(Ok(db)) => db,
        Some(Err(e)) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!("No database given; pass --db or set [source] database");
            return ExitCode::FAILURE;
        }
    };

    let source = match SqliteSource::open(&db) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening database '{}': {}", db.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let (temp_dir, converter) = match (settings.temp_dir(), settings.converter()) {
        (Ok(t), Ok(c)) => (t, c),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = ReportPipeline::new(definition.catalog, source)
        .with_temp_dir(&temp_dir)
        .with_converter(Box::new(converter));

    if store {
        let root = match settings.storage_root() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let storage = FsStorage::new(root);
        let mut record = ReportRecord::new(id, definition.report);
        record.report_id = report_id;

        return match pipeline.generate_report(&mut record, format, &storage) {
            Ok(stored) => {
                println!("{}", stored.full_path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Report error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match pipeline.create_report(&definition.report, format.as_str(), Delivery::Stream(&mut out)) {
        Ok(ReportArtifact::Placeholder(text)) => match writeln!(out, "{}", text) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error writing report: {}", e);
                ExitCode::FAILURE
            }
        },
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Report error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_fields(file: PathBuf) -> ExitCode {
    let Some(definition) = load_definition(&file) else {
        return ExitCode::FAILURE;
    };
    let catalog = &definition.catalog;
    let numeric = catalog.numeric_sort_fields();

    println!("Report: {}", catalog.report_name());
    println!("Entity: {}", catalog.entity().table);
    println!();
    println!("Fields:");
    for (name, label) in catalog.fields().iter() {
        let marker = if numeric.iter().any(|n| n == name) {
            " (numeric sort)"
        } else {
            ""
        };
        println!("  - {} \"{}\"{}", name, label, marker);
    }

    let joins = catalog.joins();
    if !joins.is_empty() {
        println!();
        println!("Joins:");
        for join in &joins {
            println!("  - {} ON {} = {}", join.table, join.left, join.right);
        }
    }
    ExitCode::SUCCESS
}
