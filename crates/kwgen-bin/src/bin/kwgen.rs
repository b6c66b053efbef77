use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use kwgen::{
    generate::read_keyword_def, generate_dir, generate_file, graph::trie_to_dot, Generator,
    GeneratorConfig, Target,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    C,
    Rust,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::C => Target::C,
            TargetArg::Rust => Target::Rust,
        }
    }
}

/// Generate a trie-based keyword recognizer from a keyword definition file
#[derive(Debug, Parser)]
#[command(name = "kwgen", version)]
struct Args {
    /// Keyword definition file, or a directory of `*.def` files
    spec: PathBuf,

    /// Language of the generated recognizer
    #[arg(long, value_enum, default_value_t = TargetArg::C)]
    target: TargetArg,

    /// Directory the two output files are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Output file stem (ignored when SPEC is a directory)
    #[arg(long, default_value = "keyword")]
    stem: String,

    /// Name of the generated public recognizer function
    #[arg(long, default_value = "recognize_keyword")]
    entry: String,

    /// Prefix of the generated per-prefix stepper functions
    #[arg(long, default_value = "kw")]
    prefix: String,

    /// Value of the first declared token
    #[arg(long, default_value_t = 1024, allow_negative_numbers = true)]
    base: i32,

    /// Print the keyword trie as Graphviz DOT instead of writing files
    #[arg(long, conflicts_with = "check")]
    dot: bool,

    /// Run the recognizer on the given words instead of writing files
    #[arg(long, num_args = 1..)]
    check: Vec<String>,

    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            target: self.target.into(),
            stem: self.stem.clone(),
            entry: self.entry.clone(),
            prefix: self.prefix.clone(),
            base: self.base,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

fn load(spec: &Path, config: GeneratorConfig) -> anyhow::Result<Generator> {
    let def = read_keyword_def(spec)?;
    let generator = Generator::from_def(config, &def)
        .with_context(|| format!("invalid keyword definition {}", spec.display()))?;
    Ok(generator)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.config();

    if args.dot {
        let generator = load(&args.spec, config)?;
        println!("{}", trie_to_dot(generator.trie(), generator.registry()));
        return Ok(());
    }

    if !args.check.is_empty() {
        let automaton = load(&args.spec, config)?.automaton();
        for word in &args.check {
            println!("{} -> {}", word, automaton.recognize(word.as_bytes()));
        }
        return Ok(());
    }

    let written = if args.spec.is_dir() {
        generate_dir(&args.spec, &args.out_dir, &config)
    } else {
        generate_file(&args.spec, &args.out_dir, &config)
    }
    .with_context(|| format!("failed to generate from {}", args.spec.display()))?;

    for path in &written {
        info!(path = %path.display(), "generated");
    }
    println!(
        "Wrote {}",
        written
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}
