use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use pktsniff::{
    CaptureLauncher, Config, ConsoleReporter, InterfaceLister, InterruptRouter, IpCommand,
    Session, Tcpdump,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pktsniff")]
#[command(about = "List network interfaces and stream tcpdump output for one of them")]
struct Args {
    /// Interface to sniff on (skips the interactive listing)
    #[arg(short, long)]
    interface: Option<String>,

    /// Path to the tcpdump binary
    #[arg(long)]
    tcpdump: Option<PathBuf>,

    /// Path to the ip binary
    #[arg(long)]
    ip: Option<PathBuf>,

    /// Config file (default /etc/pktsniff.conf)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Extra tcpdump arguments, e.g. `-- port 53`
    #[arg(last = true)]
    extra: Vec<String>,
}

fn init_tracing(config: &Config, verbose: u8) {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = args.tcpdump {
        config.tcpdump = path;
    }
    if let Some(path) = args.ip {
        config.ip = path;
    }
    if !args.extra.is_empty() {
        config.extra_args = args.extra;
    }

    init_tracing(&config, args.verbose);
    tracing::debug!("Config: {:?}", config);

    let router = InterruptRouter::new();
    router
        .install()
        .context("Failed to install Ctrl+C handler")?;

    let lister = InterfaceLister::new(IpCommand::new(config.ip.clone()));
    let tool = Tcpdump::new(config.tcpdump.clone()).with_extra_args(config.extra_args.clone());
    let launcher = CaptureLauncher::new(tool, router);
    let mut session = Session::new(lister, launcher).with_interface(args.interface);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut reporter = ConsoleReporter::new();
    let outcome = session.run(&mut input, &mut reporter);
    tracing::debug!("Session finished: {:?}", outcome);

    Ok(ExitCode::from(outcome.exit_status()))
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
