use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(
    name = "items",
    about = "Item collection service: serve the REST API or edit the data file",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// JSON document holding the collection (default: data/items.json)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create an empty data file if none exists
    Init,
    /// Show every item
    List,
    /// Create an item
    Add(AddArgs),
    /// Merge fields onto an existing item
    Update(UpdateArgs),
    /// Delete an item
    Remove(RemoveArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<String>,
    /// Lock around every mutating request
    #[arg(long)]
    pub serialize_writes: bool,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: String,
    /// Extra field as key=value; the value is parsed as JSON when possible
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, Value)>,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub id: String,
}

/// Parse `key=value`. The value is read as JSON, falling back to a string.
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    if key.is_empty() {
        return Err(format!("empty field name in {raw:?}"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Assemble a create/update payload from `--name` and `--field` flags.
pub fn build_payload(name: Option<String>, fields: Vec<(String, Value)>) -> Value {
    let mut map = Map::new();
    if let Some(name) = name {
        map.insert("name".into(), Value::String(name));
    }
    map.extend(fields);
    Value::Object(map)
}
