//! Sigil CLI - attestation schema tool.
//!
//! # Commands
//!
//! - `sigil schema validate <file>` - Validate a schema document
//! - `sigil schema text <file>` - Render the canonical schema text
//! - `sigil schema abi <file>` - Show the flattened ABI projection
//! - `sigil schema id <file>` - Compute the schema content id
//! - `sigil encode` - Encode a payload to wire elements
//! - `sigil decode` - Decode wire elements back to a payload

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sigil_abi::{deserialize, schema_id, schema_text, serialize, Element, StructABI, Value};
use sigil_schema::{validate, Schema};

#[derive(Parser)]
#[command(name = "sigil")]
#[command(about = "Attestation schema tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate schema documents
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },

    /// Encode a payload file against a schema
    Encode {
        /// Schema JSON file
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Payload JSON file (array of typed values)
        #[arg(long, short = 'p')]
        payload: PathBuf,

        /// Output file (default: stdout, one element per line)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Decode wire elements against a schema
    Decode {
        /// Schema JSON file
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Element file, one 0x-prefixed hex element per line
        #[arg(long, short = 'e')]
        elements: PathBuf,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Validate a schema document
    Validate { file: PathBuf },

    /// Render the canonical schema text
    Text { file: PathBuf },

    /// Show the flattened ABI projection
    Abi { file: PathBuf },

    /// Compute the schema content id
    Id { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { command } => match command {
            SchemaCommands::Validate { file } => cmd_validate(&file),
            SchemaCommands::Text { file } => cmd_text(&file),
            SchemaCommands::Abi { file } => cmd_abi(&file),
            SchemaCommands::Id { file } => cmd_id(&file),
        },
        Commands::Encode {
            schema,
            payload,
            output,
        } => cmd_encode(&schema, &payload, output),
        Commands::Decode { schema, elements } => cmd_decode(&schema, &elements),
    }
}

fn load_schema(path: &Path) -> Result<Schema> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))?;
    let schema: Schema = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse schema JSON in {:?}", path))?;
    validate(&schema).with_context(|| format!("Schema {:?} is invalid", path))?;
    Ok(schema)
}

fn cmd_validate(file: &Path) -> Result<()> {
    let schema = load_schema(file)?;
    println!(
        "Valid schema '{}' (version {}, {} field(s))",
        schema.name,
        schema.version,
        schema.fields.len()
    );
    Ok(())
}

fn cmd_text(file: &Path) -> Result<()> {
    let schema = load_schema(file)?;
    println!("{}", schema_text(&schema));
    Ok(())
}

fn cmd_abi(file: &Path) -> Result<()> {
    let schema = load_schema(file)?;
    let abi = StructABI::from_schema(&schema);

    println!("Schema: {} (version {})", schema.name, schema.version);
    println!(
        "Fields: {}, total fixed size: {} bytes",
        abi.field_count(),
        abi.total_size()
    );
    for field in abi.fields() {
        if field.size_bytes == 0 {
            println!("  {}: {} (variable)", field.name, field.type_name);
        } else {
            println!(
                "  {}: {} ({} bytes)",
                field.name, field.type_name, field.size_bytes
            );
        }
    }
    Ok(())
}

fn cmd_id(file: &Path) -> Result<()> {
    let schema = load_schema(file)?;
    println!("{}", schema_id(&schema));
    Ok(())
}

fn cmd_encode(schema_path: &Path, payload_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let schema = load_schema(schema_path)?;

    let payload_json = fs::read_to_string(payload_path)
        .with_context(|| format!("Failed to read file {:?}", payload_path))?;
    let payload: Vec<Value> = serde_json::from_str(&payload_json)
        .with_context(|| format!("Failed to parse payload JSON in {:?}", payload_path))?;

    let elements = serialize(&schema, &payload)
        .with_context(|| format!("Payload does not conform to schema '{}'", schema.name))?;

    let mut lines = String::new();
    for element in &elements {
        lines.push_str(&element.to_string());
        lines.push('\n');
    }

    match output {
        Some(path) => {
            fs::write(&path, &lines)
                .with_context(|| format!("Failed to write elements to {:?}", path))?;
            eprintln!("{} element(s) written to {:?}", elements.len(), path);
        }
        None => print!("{}", lines),
    }
    Ok(())
}

fn cmd_decode(schema_path: &Path, elements_path: &Path) -> Result<()> {
    let schema = load_schema(schema_path)?;

    let content = fs::read_to_string(elements_path)
        .with_context(|| format!("Failed to read file {:?}", elements_path))?;
    let elements: Vec<Element> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            Element::from_hex(line).map_err(|e| anyhow::anyhow!("Bad element '{}': {}", line, e))
        })
        .collect::<Result<_>>()?;

    let payload = deserialize(&schema, &elements)
        .with_context(|| format!("Elements do not decode against schema '{}'", schema.name))?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
