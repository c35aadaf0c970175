use clap::{Parser, Subcommand};
use pafwert::{
    Generator, GeneratorConfig, PafwertError, Pattern, PatternLibrary, RandomSource, RngSource,
    Wordlists,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Pattern-based password generator
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pattern to generate from; picked from the patterns file when omitted
    #[arg(short, long)]
    pattern: Option<String>,

    /// Number of passwords to generate
    #[arg(short = 'n', long, default_value_t = 12)]
    count: usize,

    /// Directory of <category>.txt wordlists
    #[arg(long, value_name = "DIR")]
    wordlists: Option<PathBuf>,

    /// Patterns file with one `name: pattern` entry per line
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// Seed for reproducible output (not for real passwords)
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with generator settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the pattern next to each password
    #[arg(long)]
    show_pattern: bool,

    /// Print passwords only
    #[arg(short, long)]
    quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a pattern and report any syntax error
    Check {
        /// Pattern to check
        pattern: String,

        /// Print the compiled pattern as JSON
        #[arg(long)]
        ast: bool,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Check { pattern, ast }) = &cli.command {
        return check(pattern, *ast);
    }

    match cli.seed {
        Some(seed) => run(&cli, RngSource::seeded(seed))?,
        None => run(&cli, RngSource::os())?,
    }
    Ok(ExitCode::SUCCESS)
}

fn check(text: &str, ast: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match Pattern::compile(text) {
        Ok(pattern) => {
            if ast {
                println!("{}", serde_json::to_string_pretty(&pattern)?);
            } else {
                println!(
                    "OK: {} node(s), {} binding(s)",
                    pattern.nodes().len(),
                    pattern.binding_count()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run<R: RandomSource>(cli: &Cli, mut rng: R) -> pafwert::Result<()> {
    let words = match &cli.wordlists {
        Some(dir) => Wordlists::from_dir(dir)?,
        None => Wordlists::builtin(),
    };
    let config = match &cli.config {
        Some(path) => read_config(path)?,
        None => GeneratorConfig::default(),
    };
    let fixed = cli.pattern.as_deref().map(Pattern::compile).transpose()?;
    let library = match (&fixed, &cli.patterns) {
        (None, Some(path)) => PatternLibrary::from_file(path)?,
        _ => PatternLibrary::builtin(),
    };

    let generator = Generator::with_config(&words, config);

    if !cli.quiet {
        println!("Generating {} password(s):\n", cli.count);
    }

    for i in 0..cli.count {
        let pattern = match &fixed {
            Some(pattern) => pattern,
            None => library
                .random(&mut rng)
                .ok_or_else(|| PafwertError::Config("no patterns available".to_string()))?,
        };
        let password = generator.generate(pattern, &mut rng)?;

        match (cli.quiet, cli.show_pattern) {
            (true, false) => println!("{}", password),
            (true, true) => println!("{}\t{}", password, pattern),
            (false, false) => println!("{}. {}", i + 1, password),
            (false, true) => println!("{}. {}\t{}", i + 1, password, pattern),
        }
    }

    Ok(())
}

fn read_config(path: &Path) -> pafwert::Result<GeneratorConfig> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| PafwertError::Config(format!("{}: {}", path.display(), e)))
}
