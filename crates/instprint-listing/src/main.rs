use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use std::path::{Path, PathBuf};

use instprint::isa::rv64;
use instprint::{CommentAnnotation, InstPrinter, PrintFlags, PrinterConfig};
use instprint_listing::{encoder_rows, load_listing, opcode_rows, render_listing};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print assembly text for decoded RV64 instructions", long_about = None)]
struct Cli {
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON listing of decoded instructions
    Render {
        /// Listing path (JSON array of entries)
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Printer configuration (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Prefix each line with its address
        #[arg(long)]
        show_address: bool,
        /// Print immediates in hex
        #[arg(long)]
        hex: bool,
        /// Print branch and jump targets as absolute addresses
        #[arg(long)]
        absolute_targets: bool,
        /// Print known CSRs by name
        #[arg(long)]
        symbolic_csr: bool,
        /// Print annotations as assembler comments
        #[arg(long)]
        comment: bool,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// List the opcode dispatch table
    Opcodes {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the raw immediate encoders
    Encoders {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn load_config(path: Option<&Path>) -> Result<PrinterConfig> {
    let Some(path) = path else { return Ok(PrinterConfig::default()) };
    let txt = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&txt).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let target = rv64::target()?;

    match cli.cmd {
        Command::Render { input, config, show_address, hex, absolute_targets, symbolic_csr, comment, out } => {
            let mut cfg = load_config(config.as_deref())?;
            cfg.flags.set(PrintFlags::HEX_IMMEDIATES, hex || cfg.flags.contains(PrintFlags::HEX_IMMEDIATES));
            cfg.flags.set(
                PrintFlags::ABSOLUTE_TARGETS,
                absolute_targets || cfg.flags.contains(PrintFlags::ABSOLUTE_TARGETS),
            );
            cfg.flags.set(
                PrintFlags::SYMBOLIC_SYSREGS,
                symbolic_csr || cfg.flags.contains(PrintFlags::SYMBOLIC_SYSREGS),
            );
            tracing::debug!(flags = ?cfg.flags, "printer configured");

            let lines = load_listing(&input)?;
            let mut printer = InstPrinter::new(target).with_config(cfg);
            if comment {
                printer = printer.with_annotation_printer(CommentAnnotation);
            }
            let buf = render_listing(&printer, &lines, show_address);
            if let Some(path) = out { std::fs::write(path, buf)?; } else { print!("{}", buf); }
        }
        Command::Opcodes { format } => {
            let rows = opcode_rows(target);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Text => {
                    println!("{:<8} {:<10} {:<10} {}", "opcode", "name", "mnemonic", "operands");
                    for r in &rows {
                        println!("{:<8} {:<10} {:<10} {}", r.opcode, r.name.unwrap_or("-"), r.mnemonic, r.template);
                    }
                }
            }
        }
        Command::Encoders { format } => {
            let rows = encoder_rows(target);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Text => {
                    println!("{:<10} {:<6} {}", "mnemonic", "index", "field");
                    for r in &rows {
                        println!("{:<10} {:<6} {}", r.mnemonic.unwrap_or("?"), r.index, r.field);
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from(["instprint", "render", "dump.json", "--hex", "--comment"]).unwrap();
        match cli.cmd {
            Command::Render { input, hex, comment, symbolic_csr, .. } => {
                assert_eq!(input, PathBuf::from("dump.json"));
                assert!(hex && comment && !symbolic_csr);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn missing_config_means_defaults() {
        assert_eq!(load_config(None).unwrap(), PrinterConfig::default());
    }
}
