use clap::{Args, Parser, Subcommand};
use sablon::{
    EngineConfig, FieldMapping, FilesystemResourceProvider, PipelineBuilder, PipelineError,
    Template,
};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

// Many small allocations per page; mimalloc keeps fragmentation down.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Renders document templates filled from JSON business records.
#[derive(Parser, Debug)]
#[command(name = "sablon", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document to a file.
    Render {
        #[command(flatten)]
        inputs: Inputs,

        /// Where to write the PDF.
        #[arg(short, long)]
        output: PathBuf,

        /// Render pages one after another.
        #[arg(long)]
        sequential: bool,

        /// Directory image and backdrop URIs are relative to. Defaults to the
        /// template's directory.
        #[arg(long)]
        resources: Option<PathBuf>,
    },
    /// Print the computed layout of every page as JSON.
    Plan {
        #[command(flatten)]
        inputs: Inputs,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    #[arg(short, long)]
    template: PathBuf,

    #[arg(short, long)]
    mappings: PathBuf,

    #[arg(short, long)]
    record: PathBuf,

    /// Engine settings (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Inputs {
    fn engine_config(&self) -> Result<EngineConfig, PipelineError> {
        match &self.config {
            Some(path) => EngineConfig::from_file(path),
            None => Ok(EngineConfig::default()),
        }
    }
}

struct Loaded {
    template: Template,
    mappings: Vec<FieldMapping>,
    record: Value,
}

fn read(path: &Path, what: &str) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read {} from '{}': {}", what, path.display(), e),
        ))
    })
}

fn load(inputs: &Inputs) -> Result<Loaded, PipelineError> {
    let template = Template::from_json(&read(&inputs.template, "template")?)
        .map_err(|e| PipelineError::Config(format!("{}: {}", inputs.template.display(), e)))?;
    let mappings = FieldMapping::list_from_json(&read(&inputs.mappings, "mappings")?)
        .map_err(|e| PipelineError::Config(format!("{}: {}", inputs.mappings.display(), e)))?;
    let record = serde_json::from_str(&read(&inputs.record, "record")?)?;
    Ok(Loaded {
        template,
        mappings,
        record,
    })
}

fn run(cli: Cli) -> Result<(), PipelineError> {
    match cli.command {
        Command::Render {
            inputs,
            output,
            sequential,
            resources,
        } => {
            let config = inputs.engine_config()?;
            let base = resources.unwrap_or_else(|| {
                inputs
                    .template
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .to_path_buf()
            });
            let pipeline = PipelineBuilder::from_config(config)
                .with_parallel_pages(!sequential)
                .with_resources(Arc::new(FilesystemResourceProvider::new(base)))
                .build()?;

            let Loaded {
                template,
                mappings,
                record,
            } = load(&inputs)?;
            let rendered = pipeline.render(&template, &mappings, &record)?;
            for warning in &rendered.warnings {
                eprintln!(
                    "warning: page {} overflows ({:.1}pt of {:.1}pt used)",
                    warning.page_index + 1,
                    warning.content_bottom,
                    warning.usable_height
                );
            }
            rendered.save(&output)?;
            println!("{} pages written to {}", rendered.page_count, output.display());
            Ok(())
        }
        Command::Plan { inputs } => {
            let pipeline = PipelineBuilder::from_config(inputs.engine_config()?)
                .with_parallel_pages(false)
                .build()?;
            let Loaded {
                template,
                mappings,
                record,
            } = load(&inputs)?;
            let plans = pipeline.plan(&template, &mappings, &record)?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(PipelineError::Validation(report)) => {
            eprintln!("error: template is not renderable");
            for issue in &report.issues {
                eprintln!("  - {}", issue);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
