use clap::{Parser, Subcommand};
use formspec::{
    format_json, map_submit_data, schema_document_json, validate_config_with, FormError,
    FormResult, SubmittedValues, ValidationOptions,
};
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formspec", about = "Validate form configs and map form submissions")]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "debug", "formspec=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate one or more config files
    Validate {
        files: Vec<String>,
        /// Report every violation instead of only the first
        #[arg(long)]
        all: bool,
    },
    /// Print the schema document for the config format
    Schema,
    /// Print a config file re-indented with 2 spaces
    Format { file: String },
    /// Map a JSON object of submitted values onto a config's fields
    Submit { config: String, values: String },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Command::Validate { files, all } => validate_files(&files, all),
        Command::Schema => report(schema_document_json()),
        Command::Format { file } => report(read_file(&file).and_then(|text| format_json(&text))),
        Command::Submit { config, values } => report(submit(&config, &values)),
    };

    process::exit(exit_code);
}

fn validate_files(files: &[String], all: bool) -> i32 {
    if files.is_empty() {
        eprintln!("Usage: formspec validate <config.json>...");
        return 1;
    }

    let options = ValidationOptions { abort_early: !all };
    let mut exit_code = 0;

    for file_path in files {
        match read_file(file_path).and_then(|text| validate_config_with(&text, options)) {
            Ok(_) => {
                println!("✓ {} is valid", file_path);
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    exit_code
}

fn submit(config_path: &str, values_path: &str) -> FormResult<String> {
    let config = validate_config_with(&read_file(config_path)?, ValidationOptions::default())?;
    let values: SubmittedValues = serde_json::from_str(&read_file(values_path)?)?;
    let records = map_submit_data(config.fields(), &values)?;
    formspec::print_json(&records)
}

fn read_file(path: &str) -> FormResult<String> {
    fs::read_to_string(path).map_err(|e| FormError::Io(format!("Failed to read {}: {}", path, e)))
}

fn report(result: FormResult<String>) -> i32 {
    match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            print_error(&e);
            1
        }
    }
}

fn print_error(error: &FormError) {
    match error {
        FormError::InvalidJson => {
            eprintln!("  {}", error);
        }
        FormError::SchemaViolation(violation) if violation.details.len() > 1 => {
            eprintln!("  Schema has errors:");
            for detail in &violation.details {
                if detail.path.is_root() {
                    eprintln!("    {}", detail.message);
                } else {
                    eprintln!("    {}: {}", detail.path, detail.message);
                }
            }
        }
        FormError::SchemaViolation(violation) => {
            eprintln!("  Schema has errors:");
            eprintln!("    {}", violation.message);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
