use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use huffpack::config::DEFAULT_CONFIG_FILE;
use huffpack::inspect;
use huffpack::protocol::header_bytes;
use huffpack::utils::io::read_all;
use huffpack::{analyze_bytes, encode_bytes, Config, FrequencyTable, HuffmanTree};

#[derive(Parser)]
#[command(name = "huffpack")]
#[command(about = "Huffman file compression")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress FILE into FILE.huf
    Compress { file: PathBuf },
    /// Decompress name.ext.huf into name_unc.ext
    Decompress { file: PathBuf },
    /// Show the frequency map
    Frequencies(InputArgs),
    /// Show the encoding tree
    Tree(InputArgs),
    /// Show the encoding map
    Codes(InputArgs),
    /// Show the encoded bit string and compressed size
    Encode(InputArgs),
    /// Print a file as text
    ViewText { file: PathBuf },
    /// Print a file as bits
    ViewBinary { file: PathBuf },
    /// Decode a compressed file in memory and report the outcome
    Verify { file: PathBuf },
    /// Write a default config file
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: PathBuf,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Input file
    file: Option<PathBuf>,

    #[arg(long, help = "Use this string instead of a file")]
    text: Option<String>,
}

impl InputArgs {
    fn load(&self) -> Result<Vec<u8>> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone().into_bytes()),
            (None, Some(file)) => Ok(read_all(file)?),
            (None, None) => anyhow::bail!("either a file or --text is required"),
        }
    }
}

pub fn run(cli: Cli, config: Config) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Commands::Compress { file } => {
            let (output, compressed) = huffpack::compress_file(&file, &config)
                .with_context(|| format!("compressing {}", file.display()))?;
            let stats = &compressed.stats;
            if json {
                let mut value = serde_json::to_value(stats)?;
                value["input"] = serde_json::json!(file);
                value["output"] = serde_json::json!(output);
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("Compressed {} -> {}", file.display(), output.display());
                println!("   Input:   {} bytes", stats.input_bytes);
                println!("   Header:  {} bytes", stats.header_bytes);
                println!("   Payload: {} bits ({} bytes)", stats.payload_bits, stats.payload_bytes);
                println!("   Output:  {} bytes ({:.1}%)", stats.container_bytes, stats.ratio() * 100.0);
            }
        }
        Commands::Decompress { file } => {
            let (output, decoded) = huffpack::decompress_file(&file, &config)
                .with_context(|| format!("decompressing {}", file.display()))?;
            if json {
                println!("{}", serde_json::json!({
                    "input": file,
                    "output": output,
                    "bytes": decoded.len(),
                }));
            } else {
                println!("Decompressed {} -> {} ({} bytes)", file.display(), output.display(), decoded.len());
            }
        }
        Commands::Frequencies(input) => {
            let table = analyze_bytes(&input.load()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&table_json(&table))?);
            } else {
                print!("{}", inspect::render_frequencies(&table));
            }
        }
        Commands::Tree(input) => {
            let tree = HuffmanTree::build(&analyze_bytes(&input.load()?))?;
            print!("{}", inspect::render_tree(&tree));
        }
        Commands::Codes(input) => {
            let tree = HuffmanTree::build(&analyze_bytes(&input.load()?))?;
            let map = tree.encoding_map();
            if json {
                let codes: serde_json::Map<String, serde_json::Value> = map
                    .iter()
                    .map(|(symbol, code)| (symbol.code().to_string(), code.to_string().into()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&codes)?);
            } else {
                print!("{}", inspect::render_encoding_map(&map));
            }
        }
        Commands::Encode(input) => {
            let data = input.load()?;
            let table = analyze_bytes(&data);
            let tree = HuffmanTree::build(&table)?;
            let bits = encode_bytes(&data, &tree.encoding_map())?;
            let size = header_bytes(&table).len() + (bits.len() + 7) / 8;
            debug!("Encoded {} bytes into {} bits", data.len(), bits.len());

            if json {
                println!("{}", serde_json::json!({
                    "bits": bits.to_string(),
                    "bit_count": bits.len(),
                    "compressed_size": size,
                }));
            } else {
                println!("Compressed file size: {}", size);
                println!("{}", bits);
            }
        }
        Commands::ViewText { file } => {
            println!("{}", file.display());
            println!("{}", inspect::render_text(&read_all(&file)?));
        }
        Commands::ViewBinary { file } => {
            println!("{}", file.display());
            print!("{}", inspect::render_binary(&read_all(&file)?));
        }
        Commands::Verify { file } => verify(&file, json)?,
        Commands::GenerateConfig { output } => {
            config.save(&output)?;
            info!("Wrote config to {:?}", output);
            if json {
                println!("{}", serde_json::json!({ "config": output }));
            } else {
                println!("Config written to {}", output.display());
            }
        }
    }

    Ok(())
}

fn verify(file: &Path, json: bool) -> Result<()> {
    let container = read_all(file)?;
    match huffpack::decompress_bytes(&container) {
        Ok(decoded) => {
            if json {
                println!("{}", serde_json::json!({ "status": "passed", "bytes": decoded.len() }));
            } else {
                println!("✅ {} decodes cleanly ({} bytes)", file.display(), decoded.len());
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!("{}", serde_json::json!({ "status": "failed", "error": e.to_string() }));
            } else {
                println!("❌ {} failed verification: {}", file.display(), e);
            }
            Err(e.into())
        }
    }
}

fn table_json(table: &FrequencyTable) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = table
        .iter()
        .map(|(symbol, count)| {
            serde_json::json!({
                "symbol": symbol.code(),
                "label": inspect::symbol_label(symbol),
                "count": count,
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}
