//! Play chess against a UCI engine from the terminal.
//!
//! Reads commands from stdin, prints replies and the board to stdout. Logs go
//! to stderr.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_session::{
    execute, Command, GameSession, ReplyKind, SearchLimit, SessionConfig,
};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chess_session", version, about = "Play chess against a UCI engine")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Engine executable, overrides the configuration
    #[arg(long, conflicts_with = "no_engine")]
    engine: Option<PathBuf>,

    /// Play both sides by hand
    #[arg(long)]
    no_engine: bool,

    /// Engine thinking time per move, in seconds
    #[arg(long, conflicts_with = "depth")]
    time: Option<f64>,

    /// Engine search depth per move, in plies
    #[arg(long)]
    depth: Option<u32>,

    /// Show the engine's suggestion after every move
    #[arg(long)]
    hints: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = load_config(&cli)?;
    info!(engine = %config.engine.path.display(), limit = %config.limit, "starting session");

    let session = config.build_session();
    run(&session, &config)
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(path) = &cli.engine {
        config.engine.path = path.clone();
        config.engine.enabled = true;
    }
    if cli.no_engine {
        config.engine.enabled = false;
    }
    if let Some(secs) = cli.time {
        config.limit = SearchLimit::seconds(secs).context("--time")?;
    }
    if let Some(plies) = cli.depth {
        config.limit = SearchLimit::depth(plies).context("--depth")?;
    }
    config.show_hints |= cli.hints;

    config.validate()?;
    Ok(config)
}

fn run(session: &GameSession, config: &SessionConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "{}", session.snapshot().diagram())?;
    writeln!(stdout, "Type `help` for commands.")?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(err) => {
                writeln!(stdout, "error: {err}")?;
                continue;
            }
        };
        debug!(?command, "command");

        let reply = execute(session, command, config.limit);
        let prefix = match reply.kind {
            ReplyKind::Ok | ReplyKind::Info => "",
            ReplyKind::Warning => "warning: ",
            ReplyKind::Error => "error: ",
        };
        writeln!(stdout, "{prefix}{}", reply.message)?;

        if reply.changed {
            writeln!(stdout, "\n{}", session.snapshot().diagram())?;
            if config.show_hints && !session.current_state().is_terminal() {
                let hint = execute(session, Command::Hint(None), config.limit);
                writeln!(stdout, "{}", hint.message)?;
            }
        }
    }

    writeln!(stdout, "Bye.")?;
    Ok(())
}
