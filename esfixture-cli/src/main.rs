use clap::{Parser, Subcommand};
use esfixture::esfixture_client::{ClientOption, DEFAULT_URL};
use esfixture::{
    CiEnvironment, DecoderPolicy, DeprecationPolicy, FatalReporter, Fixture, Harness,
    HarnessConfig, Recorder, INDEX_NAME, INDEX_NAME_2,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "esfixture", version, about = "Provision Elasticsearch test fixtures")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, env = "ESFIXTURE_URL", default_value = DEFAULT_URL, global = true)]
    url: String,
    /// off, log or fail
    #[arg(long, env = "ESFIXTURE_DEPRECATIONS", default_value = "off", global = true)]
    deprecations: String,
    /// Reject response fields the client does not know about
    #[arg(
        long,
        env = "ESFIXTURE_STRICT_DECODER",
        global = true,
        value_parser = parse_decoder_policy,
        default_value = "false",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    strict_decoder: DecoderPolicy,
    /// Mapping file used instead of the built-in one
    #[arg(long, env = "ESFIXTURE_MAPPING", global = true)]
    mapping: Option<PathBuf>,
    /// Log request and response bodies
    #[arg(long, global = true)]
    trace_log: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Recreate the fixture indices and seed them
    Provision {
        /// Seed the two source-less tweets instead of the full corpus
        #[arg(long, conflicts_with = "indices_only")]
        no_source: bool,
        /// Create the indices without documents
        #[arg(long)]
        indices_only: bool,
    },
    /// Delete the fixture indices
    Clean,
}

/// Same values `ESFIXTURE_STRICT_DECODER` accepts in the library.
fn parse_decoder_policy(value: &str) -> Result<DecoderPolicy, String> {
    DecoderPolicy::parse_flag(value).map_err(|e| e.to_string())
}

/// Writes entries to stderr and counts failures; fatal errors exit the process.
#[derive(Default)]
struct ConsoleReporter {
    failures: AtomicUsize,
}

impl Recorder for ConsoleReporter {
    fn log(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}

impl FatalReporter for ConsoleReporter {
    fn fatal(&self, message: &str) -> ! {
        eprintln!("Error: {}", message);
        std::process::exit(1)
    }
}

fn summarize(fixture: &Fixture) {
    println!(
        "{}: {:?} ({} documents seeded)",
        fixture.client().base_url(),
        fixture.state(),
        fixture.seeded().len()
    );
}

#[tokio::main]
async fn main() {
    esfixture::logging::init_tracing();
    let cli = Cli::parse();

    let mut config = HarnessConfig::default()
        .with_url(cli.url)
        .with_decoder(cli.strict_decoder)
        .with_deprecations(DeprecationPolicy::parse(&cli.deprecations));
    if let Some(path) = cli.mapping {
        config = config.with_mapping_path(path);
    }
    config.ci = CiEnvironment::detect();

    let reporter = Arc::new(ConsoleReporter::default());
    let harness = match Harness::new(config, reporter.clone()) {
        Ok(h) => h,
        Err(e) => reporter.fatal(&e.to_string()),
    };
    let options = if cli.trace_log {
        vec![ClientOption::TraceLog(true)]
    } else {
        Vec::new()
    };

    let fixture = match cli.command {
        Command::Clean => harness.setup_client(options).await,
        Command::Provision {
            indices_only: true, ..
        } => harness.setup_client_and_create_indices(options).await,
        Command::Provision {
            no_source: true, ..
        } => harness.setup_client_and_add_docs_no_source(options).await,
        Command::Provision { .. } => harness.setup_client_and_add_docs(options).await,
    };
    let fixture = harness.must(fixture);

    match fixture.state() {
        esfixture::FixtureState::IndicesCleaned => {
            println!("Removed {} and {}", INDEX_NAME, INDEX_NAME_2)
        }
        _ => summarize(&fixture),
    }

    let failures = reporter.failures.load(Ordering::SeqCst);
    if failures > 0 {
        eprintln!("Error: {} deprecation warning(s) reported", failures);
        std::process::exit(1);
    }
}
