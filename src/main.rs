use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use csv::StringRecord;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ledgercraft::{
    apply_field_formatting, format_date, format_date_time, merge_client_prefill,
    parse_format_options, values_from_json, values_to_json, DateFormat, FieldValue, FieldValues,
    FormDefinition,
};

#[derive(Parser)]
#[command(name = "ledgercraft")]
#[command(about = "Field formatting and client prefill for LedgerCraft forms.")]
#[command(version)]
struct CommandLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format one value the way a form field would display it
    #[command(alias = "f")]
    Format {
        /// Raw value; JSON (1234.5, true, null, "text") or plain text
        value: String,
        /// Field type tag (text, number, date, select, ...)
        #[arg(short = 't', long = "type", default_value = "text")]
        field_type: String,
        /// Format options as stored, e.g. '{"decimals":2,"currencySymbol":"₹"}'
        #[arg(short, long)]
        options: Option<String>,
    },
    /// Format a date in one of the supported layouts
    #[command(alias = "d")]
    Date {
        input: String,
        /// DD-MM-YYYY, MM-DD-YYYY or YYYY-MM-DD
        #[arg(short, long, default_value = "DD-MM-YYYY")]
        format: String,
        /// Append the time of day
        #[arg(long)]
        time: bool,
    },
    /// Merge a client record into a form draft (both JSON objects)
    #[command(alias = "m")]
    Merge { form: PathBuf, client: PathBuf },
    /// Render CSV records through a form definition
    #[command(alias = "r")]
    Render { definition: PathBuf, records: PathBuf },
}

fn main() -> Result<()> {
    init_logging();

    let commands = CommandLine::parse();
    match commands.command {
        Commands::Format { value, field_type, options } => {
            run_format(&value, &field_type, options.as_deref())
        }
        Commands::Date { input, format, time } => {
            run_date(&input, DateFormat::from(format.as_str()), time);
            Ok(())
        }
        Commands::Merge { form, client } => run_merge(&form, &client),
        Commands::Render { definition, records } => run_render(&definition, &records),
    }
}

/// Logs go to stderr; RUST_LOG overrides the default "warn"
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_format(value: &str, field_type: &str, options: Option<&str>) -> Result<()> {
    let value = serde_json::from_str::<Value>(value)
        .map(FieldValue::from)
        .unwrap_or_else(|_| FieldValue::from(value));

    let options = match options {
        Some(raw) => parse_format_options(raw).context("Invalid --options")?,
        None => None,
    };

    println!("{}", apply_field_formatting(&value, field_type, options.as_ref()));
    Ok(())
}

fn run_date(input: &str, format: DateFormat, time: bool) {
    let output = if time {
        format_date_time(input, format)
    } else {
        format_date(input, format)
    };
    println!("{}", output);
}

fn read_values(path: &Path) -> Result<FieldValues> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let json: Value =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {:?}", path))?;

    if !json.is_object() {
        bail!("{:?} must contain a JSON object of field values", path);
    }
    Ok(values_from_json(json))
}

fn run_merge(form: &Path, client: &Path) -> Result<()> {
    let form_values = read_values(form)?;
    let client_values = read_values(client)?;

    let merged = merge_client_prefill(&form_values, &client_values);
    println!("{}", serde_json::to_string_pretty(&values_to_json(&merged))?);
    Ok(())
}

fn run_render(definition: &Path, records: &Path) -> Result<()> {
    let form = FormDefinition::from_json_file(definition)?;
    let file = fs::File::open(records).with_context(|| format!("Failed to open CSV file {:?}", records))?;

    let count = render_records(&form, file, io::stdout())?;
    tracing::info!(records = count, form = %form.id, "rendered CSV records");
    Ok(())
}

/// Render every CSV record through the form; output columns follow field order, headed by labels
fn render_records<R: io::Read, W: io::Write>(form: &FormDefinition, input: R, output: W) -> Result<usize> {
    let mut rdr = csv::Reader::from_reader(input);
    let headers = rdr.headers().context("Failed to read CSV headers")?.clone();

    let unknown: Vec<&str> = headers.iter().filter(|h| form.field(h).is_none()).collect();
    if !unknown.is_empty() {
        tracing::warn!(columns = ?unknown, "CSV columns not in form definition are ignored");
    }

    let mut wtr = csv::Writer::from_writer(output);
    wtr.write_record(form.fields.iter().map(|f| f.label.as_str()))?;

    let mut count = 0;
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV record {}", line + 1))?;

        let values = record_values(&headers, &record);
        let rendered = form.render(&values);
        wtr.write_record(rendered.iter().map(|r| r.display.as_str()))?;
        count += 1;
    }
    wtr.flush()?;

    Ok(count)
}

/// Empty cells are unfilled fields, not empty strings
fn record_values(headers: &StringRecord, record: &StringRecord) -> FieldValues {
    headers
        .iter()
        .zip(record.iter())
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(key, cell)| (key.to_string(), FieldValue::from(cell)))
        .collect()
}
