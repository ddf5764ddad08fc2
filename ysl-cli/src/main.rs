use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ysl_core::loadpath::{list_documents, resolve_load_path};
use ysl_core::{PassthroughLayout, construct, decode_str, print_formatted};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        help = "Provisional node tree (YAML) from the document parser; stdin when omitted"
    )]
    input: Option<String>,

    #[arg(short, long, help = "Target source file; stdout when omitted")]
    output: Option<String>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Library search root (defaults to YSLPATH, then the input directory)"
    )]
    load_path: Option<String>,

    #[arg(long, help = "List library documents found on the search root")]
    list_libs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let input_path = cli.input.as_ref().map(PathBuf::from);
    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {path}"))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if cli.list_libs {
        let root = search_root(cli.load_path.as_deref(), input_path.as_deref())?;
        let documents = list_documents(&root)
            .with_context(|| format!("failed to scan load path {}", root.display()))?;
        for document in documents {
            eprintln!("library: {}", document.path.display());
        }
    }

    let tree = decode_str(&source)?;
    let top = construct(&tree)?;
    // The external layout engine runs out of process; emit the
    // printer's text unchanged.
    let text = print_formatted(&top, &PassthroughLayout)?;

    match &cli.output {
        Some(path) => write_output(path, text.as_bytes())?,
        None => println!("{text}"),
    }
    Ok(())
}

fn search_root(flag: Option<&str>, input: Option<&Path>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(resolve_load_path(input)?),
    }
}

fn write_output(path: &str, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = PathBuf::from(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("failed to write output file {path}"))?;
    Ok(())
}
