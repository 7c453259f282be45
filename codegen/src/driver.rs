use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::builder::SectionBuffer;
use crate::closure::{output_path, ClosureGenerator};
use crate::error::GenError;
use protoclosure_descriptor::decode_descriptor_set;

/// Everything the driver needs for one compilation: exactly one input
/// source, exactly one output target, plus the protoc import search path.
#[derive(Debug, Default)]
pub struct CompilerOptions {
    /// Schema source files, compiled to a descriptor set through `protoc`.
    pub input_files: Vec<PathBuf>,
    /// A pre-built binary descriptor set on disk.
    pub input_descriptor: Option<PathBuf>,
    /// A pre-built binary descriptor set already in memory (e.g. stdin).
    pub descriptor_bytes: Option<Vec<u8>>,
    /// Import search directories passed to `protoc`.
    pub search_dirs: Vec<PathBuf>,
    /// Write one file per schema file under this directory.
    pub output_dir: Option<PathBuf>,
    /// Write all generated code to a single file.
    pub output_file: Option<PathBuf>,
    /// Write all generated code to standard out.
    pub stdout: bool,
    pub debug: bool,
}

impl CompilerOptions {
    /// Check for missing and mutually-exclusive options. Runs before any
    /// generation begins.
    pub fn validate(&self) -> Result<(), GenError> {
        let input_count = [
            !self.input_files.is_empty(),
            self.input_descriptor.is_some(),
            self.descriptor_bytes.is_some(),
        ]
        .iter()
        .filter(|selected| **selected)
        .count();

        if input_count == 0 {
            return Err(GenError::Config(
                "Must specify at least one input source.".to_string(),
            ));
        }
        if input_count > 1 {
            return Err(GenError::Config(
                "Please specify only one type of input source.".to_string(),
            ));
        }

        let output_count = [
            self.output_dir.is_some(),
            self.output_file.is_some(),
            self.stdout,
        ]
        .iter()
        .filter(|selected| **selected)
        .count();

        if output_count == 0 {
            return Err(GenError::Config(
                "Must specify an output target.".to_string(),
            ));
        }
        if output_count > 1 {
            return Err(GenError::Config(
                "Please specify only one output target.".to_string(),
            ));
        }

        Ok(())
    }
}

/// Run one compilation: load the descriptor set, generate javascript for
/// every schema file in it, and write the output per the selected target.
pub fn run(options: &CompilerOptions) -> Result<(), GenError> {
    options.validate()?;

    let bytes = load_descriptor_bytes(options)?;
    let files = decode_descriptor_set(&bytes)?;

    if options.debug {
        if let Ok(json) = serde_json::to_string_pretty(&files) {
            eprintln!("DEBUG: decoded descriptor set:\n{}", json);
        }
    }

    let mut generator = ClosureGenerator::new(&files);
    if options.debug {
        generator.enable_debug();
    }

    if let Some(output_dir) = &options.output_dir {
        println!("Compiling {} proto files to {}", files.len(), output_dir.display());
        for file in &files {
            let buffer = SectionBuffer::new();
            generator.process_file(file, &buffer)?;
            let target = output_dir.join(output_path(file));
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, buffer.render())?;
            println!("{} -> {}", file.name, target.display());
        }
    } else {
        let buffer = SectionBuffer::new();
        for file in &files {
            generator.process_file(file, &buffer)?;
        }
        let code = buffer.render();
        if let Some(output_file) = &options.output_file {
            if let Some(parent) = output_file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(output_file, code)?;
        } else {
            print!("{}", code);
        }
    }

    Ok(())
}

fn load_descriptor_bytes(options: &CompilerOptions) -> Result<Vec<u8>, GenError> {
    if let Some(bytes) = &options.descriptor_bytes {
        return Ok(bytes.clone());
    }
    if let Some(path) = &options.input_descriptor {
        return Ok(fs::read(path)?);
    }

    // Proto-file input: have protoc build a descriptor set in a temp file.
    let temp = std::env::temp_dir().join(format!("protoclosure_{}.desc", std::process::id()));
    let bytes = compile_protos_to_descriptor(&options.input_files, &options.search_dirs, &temp)
        .and_then(|_| Ok(fs::read(&temp)?));
    let _ = fs::remove_file(&temp);
    bytes
}

fn compile_protos_to_descriptor(
    files: &[PathBuf],
    search_dirs: &[PathBuf],
    output: &Path,
) -> Result<(), GenError> {
    let mut command = Command::new("protoc");
    for dir in search_dirs {
        command.arg(format!("--proto_path={}", dir.display()));
    }
    command.arg(format!("--descriptor_set_out={}", output.display()));
    for file in files {
        command.arg(file);
    }

    let status = command.status()?;
    if !status.success() {
        return Err(GenError::Protoc(status.code().unwrap_or(-1)));
    }
    Ok(())
}
