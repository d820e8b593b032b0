use botbarrier::{ChallengeConfig, ChallengeConfigBuilder, Error, Session, WriterHost};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Solve a bot-barrier proof-of-work challenge and print the credential as
/// `Set-Cookie` header lines.
#[derive(Parser, Debug)]
#[command(name = "botbarrier-solve", version)]
struct Cli {
    /// JSON challenge file, or `-` for stdin.
    #[arg(long, conflicts_with_all = ["seed", "tag", "complexity", "ttl"])]
    challenge: Option<PathBuf>,
    /// Hex-encoded seed.
    #[arg(long)]
    seed: Option<String>,
    /// Authentication tag, echoed back verbatim.
    #[arg(long)]
    tag: Option<String>,
    /// Required leading zero bits.
    #[arg(long)]
    complexity: Option<u32>,
    /// Credential lifetime in seconds.
    #[arg(long)]
    ttl: Option<u64>,
    #[arg(long)]
    seed_cookie: Option<String>,
    #[arg(long)]
    solution_cookie: Option<String>,
    #[arg(long)]
    mac_cookie: Option<String>,
    /// Give up after this many seconds. Without it the search runs until solved.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> ExitCode {
    init_tracing();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "solve failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> botbarrier::Result<()> {
    let timeout = cli.timeout_secs.map(Duration::from_secs);
    let config = load_config(cli)?;
    let (solver, pending) = Session::new(config)?.into_parts();

    let handle = solver.spawn()?;
    let solution = match timeout {
        Some(timeout) => handle.wait_timeout(timeout)?,
        None => handle.wait()?,
    };
    info!(attempts = solution.attempts, "emitting credential");

    let stdout = std::io::stdout();
    let mut host = WriterHost::new(stdout.lock());
    pending.emit(&solution, &mut host)?;
    Ok(())
}

fn load_config(cli: Cli) -> botbarrier::Result<ChallengeConfig> {
    if let Some(path) = cli.challenge {
        if path.as_os_str() == "-" {
            return ChallengeConfig::from_reader(std::io::stdin().lock());
        }
        let file = File::open(&path)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        return ChallengeConfig::from_reader(BufReader::new(file));
    }

    let mut builder = ChallengeConfigBuilder::default();
    if let Some(seed) = cli.seed {
        builder = builder.seed_hex(seed);
    }
    if let Some(tag) = cli.tag {
        builder = builder.authentication_tag(tag);
    }
    if let Some(complexity) = cli.complexity {
        builder = builder.complexity(complexity);
    }
    if let Some(ttl) = cli.ttl {
        builder = builder.credential_ttl_secs(ttl);
    }
    if let Some(name) = cli.seed_cookie {
        builder = builder.seed_cookie_name(name);
    }
    if let Some(name) = cli.solution_cookie {
        builder = builder.solution_cookie_name(name);
    }
    if let Some(name) = cli.mac_cookie {
        builder = builder.mac_cookie_name(name);
    }
    builder.build_validated()
}
