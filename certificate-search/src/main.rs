use anyhow::{bail, Context, Result};
use certificate_search::codec::{decode, looks_like_dimacs, parse_dimacs, Instance};
use certificate_search::config::SearchConfig;
use certificate_search::core::{Outcome, Rule};
use certificate_search::search::{decide_with, Search, SearchReport};
use certificate_search::verifiers::{parse_magnitude, CertificateVerifier, ProblemKind, TableCache};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "certificate-search")]
#[command(about = "Run simulated Turing-machine verifiers and search for accepted certificates")]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. info, debug, certificate_search=trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether some certificate makes the verifier accept. Exits 0 for Yes, 1 for No.
    Decide {
        #[command(flatten)]
        search: SearchArgs,
        /// The instance as a tape string, e.g. `1_2&-1_3#`.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        tape: Option<String>,
        /// A DIMACS CNF file, or a file whose first non-empty line is a tape string.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the full search report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run the verifier once on an `instance#certificate` tape. Exits 0 on Accept.
    Verify {
        #[arg(long)]
        kind: ProblemKind,
        #[arg(long)]
        tape: String,
        #[arg(long)]
        input_check: bool,
        #[arg(long)]
        step_bound: Option<u64>,
    },
    /// Decide every tape line of a file, sharing one table cache.
    Batch {
        #[command(flatten)]
        search: SearchArgs,
        #[arg(long)]
        file: PathBuf,
        /// Print one JSON report per line.
        #[arg(long)]
        json: bool,
    },
    /// Build a verifier table and print its size and fingerprint.
    Table {
        #[arg(long)]
        kind: ProblemKind,
        /// Required by sat-dynamic: the largest variable index the table must handle.
        #[arg(long)]
        magnitude: Option<String>,
        #[arg(long)]
        input_check: bool,
        /// Also print every defined transition.
        #[arg(long)]
        rules: bool,
    },
}

/// Search settings. Flags override values from `--config`.
#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    kind: ProblemKind,
    /// Certificate length (default: number of variables or elements).
    #[arg(long)]
    length: Option<usize>,
    /// A fixed step bound per walk, replacing the step policy.
    #[arg(long)]
    step_bound: Option<u64>,
    /// Enumerate every certificate instead of pruning infeasible prefixes.
    #[arg(long)]
    no_pruning: bool,
    /// Validate the certificate segment before each verification.
    #[arg(long)]
    input_check: bool,
    /// A JSON search configuration.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SearchArgs {
    fn config(&self) -> Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => SearchConfig::default(),
        };
        if self.length.is_some() {
            config.certificate_length = self.length;
        }
        if self.step_bound.is_some() {
            config.step_bound = self.step_bound;
        }
        if self.no_pruning {
            config.pruning = false;
        }
        if self.input_check {
            config.input_check = true;
        }
        Ok(config)
    }
}

/// The instance held in `path`: DIMACS if it looks like it, else the first non-empty line.
enum FileInput {
    Cnf(Instance),
    Tape(String),
}

fn read_input(path: &Path) -> Result<FileInput> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    if looks_like_dimacs(&name, &text) {
        let cnf = parse_dimacs(&text).with_context(|| format!("parsing {}", path.display()))?;
        return Ok(FileInput::Cnf(Instance::Sat(cnf)));
    }
    match text.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => Ok(FileInput::Tape(tape_line(line))),
        None => bail!("{} holds no tape", path.display()),
    }
}

/// Tape files may separate fields with spaces.
fn tape_line(line: &str) -> String {
    line.replace(' ', "_")
}

fn print_report(report: &SearchReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report.decision);
    }
    Ok(())
}

fn exit_code(yes: bool) -> ExitCode {
    if yes {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    let mut cache = TableCache::new();
    match command {
        Commands::Decide {
            search,
            tape,
            file,
            json,
        } => {
            let config = search.config()?;
            let input = match (tape, file) {
                (Some(tape), _) => FileInput::Tape(tape),
                (None, Some(path)) => read_input(&path)?,
                (None, None) => bail!("one of --tape or --file is required"),
            };
            let report = match input {
                FileInput::Tape(tape) => decide_with(&mut cache, search.kind, &tape, &config)
                    .with_context(|| format!("deciding {tape:?}"))?,
                FileInput::Cnf(instance) => {
                    let cnf_search = Search::configure(&mut cache, search.kind, &instance, &config)
                        .context("setting up the search")?;
                    cnf_search.run()
                }
            };
            print_report(&report, json)?;
            Ok(exit_code(report.decision.is_yes()))
        }
        Commands::Verify {
            kind,
            tape,
            input_check,
            step_bound,
        } => {
            let (instance, certificate) =
                decode(kind.family(), &tape).with_context(|| format!("decoding {tape:?}"))?;
            let magnitude = i64::try_from(instance.magnitude()).unwrap_or(i64::MAX);
            let machine = cache.get(kind, Some(magnitude), input_check)?;
            let verifier = CertificateVerifier::new(machine, kind.family()).with_step_bound(step_bound);
            let walk = verifier.verify(&instance, &certificate)?;
            println!("{} after {} steps", walk.outcome, walk.steps);
            Ok(exit_code(walk.outcome == Outcome::Accept))
        }
        Commands::Batch { search, file, json } => {
            let config = search.config()?;
            let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
            let mut failures = 0;
            let mut decided = 0;
            for (i, line) in text.lines().enumerate() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let tape = tape_line(line);
                match decide_with(&mut cache, search.kind, &tape, &config) {
                    Ok(report) if json => println!("{}", serde_json::to_string(&report)?),
                    Ok(report) => println!("{}\t{}", tape, report.decision),
                    Err(e) => {
                        failures += 1;
                        eprintln!("{}:{}: {}", file.display(), i + 1, e);
                        continue;
                    }
                }
                decided += 1;
            }
            info!(decided, failures, tables = cache.len(), "batch finished");
            Ok(if failures > 0 { ExitCode::from(2) } else { ExitCode::SUCCESS })
        }
        Commands::Table {
            kind,
            magnitude,
            input_check,
            rules,
        } => {
            let magnitude = magnitude.as_deref().map(parse_magnitude).transpose()?;
            let machine = cache.get(kind, magnitude, input_check)?;
            println!("machine:     {}", machine.name);
            println!("states:      {}", machine.table.len());
            let defined = machine.rules().filter(|rule| matches!(rule, Rule::Move { .. })).count();
            println!("rules:       {}", defined);
            println!("fingerprint: {:016x}", machine.table.fingerprint());
            if rules {
                print!("{}", machine);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
