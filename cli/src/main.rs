use std::io::Read;
use std::path::PathBuf;

use clap::Parser;

use protoclosure_codegen::{run, CompilerOptions, GenError};

#[derive(Parser)]
#[command(name = "protoclosure")]
#[command(about = "Generate Closure-style javascript from protocol buffer schemas", long_about = None)]
struct Cli {
    /// `.proto` schema files, compiled through `protoc`
    proto_files: Vec<PathBuf>,

    /// Read a pre-built binary descriptor set from this file
    #[arg(short = 'p', long)]
    input_descriptor: Option<PathBuf>,

    /// Read a pre-built binary descriptor set from standard input
    #[arg(long)]
    stdin_descriptor: bool,

    /// Import search directory for `protoc` (repeatable)
    #[arg(short = 'I', long = "proto-path")]
    proto_paths: Vec<PathBuf>,

    /// Write all generated code to a single file
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// Write one `.js` file per schema file under this directory
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Write all generated code to standard out
    #[arg(long)]
    stdout: bool,

    /// Dump the decoded descriptor set and skipped fields to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), GenError> {
    let cli = Cli::parse();

    let descriptor_bytes = if cli.stdin_descriptor {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).map_err(GenError::Io)?;
        Some(bytes)
    } else {
        None
    };

    let options = CompilerOptions {
        input_files: cli.proto_files,
        input_descriptor: cli.input_descriptor,
        descriptor_bytes,
        search_dirs: cli.proto_paths,
        output_dir: cli.output_dir,
        output_file: cli.output_file,
        stdout: cli.stdout,
        debug: cli.debug,
    };

    run(&options)
}
