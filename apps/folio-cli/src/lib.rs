//! # Folio CLI Library
//!
//! Wires configuration, logging, the cart store and the sync worker, then
//! reads cart commands from stdin.
//!
//! ## Module Organization
//! ```text
//! folio_cli/
//! ├── lib.rs          ◄─── You are here (startup & session loop)
//! ├── commands.rs     ◄─── Command parsing and execution
//! ├── render.rs       ◄─── Cart tables and summaries
//! └── error.rs        ◄─── CLI error type
//! ```

pub mod commands;
pub mod error;
pub mod render;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use folio_sync::auth::TOKEN_ENV_VAR;
use folio_sync::{
    CartStore, EnvToken, FolioConfig, HttpRemoteCart, Outbox, RemoteCart, StaticToken,
    SyncWorker, SyncWorkerHandle, TokenProvider,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Command, Flow};
use error::CliResult;

/// Bookstore cart in the terminal.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
pub struct Args {
    /// Path to folio.toml (defaults to the platform config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Keep the cart local; never contact the server
    #[arg(long)]
    pub offline: bool,

    /// Bearer token for the cart API
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,
}

/// Runs the CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize logging (RUST_LOG, default info,folio=debug)             │
/// │  2. Load config: defaults → folio.toml → FOLIO_* env                    │
/// │  3. Offline? → local-only CartStore, skip to 6                          │
/// │  4. Build HttpRemoteCart, hydrate from the server cart if configured    │
/// │  5. Spawn the SyncWorker on the outbox                                  │
/// │  6. Read commands until `quit` or end of input                          │
/// │  7. Shut the worker down (queued changes are still sent)                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(args: Args) -> CliResult<()> {
    init_tracing();

    let config = match args.config.clone() {
        Some(path) => FolioConfig::load(Some(path))?,
        None => FolioConfig::load_or_default(None),
    };
    info!(session = %config.session.name, api = %config.api.base_url, "Starting folio");

    let offline = args.offline || !config.is_sync_enabled();
    let (mut store, worker) = if offline {
        info!("Offline mode, cart stays local");
        (CartStore::new(), None)
    } else {
        let (store, handle, task) = connect(&config, token_provider(&args)).await?;
        (store, Some((handle, task)))
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let result = run_session(&mut store, stdin, &mut std::io::stdout()).await;

    // Dropping the store drops its outbox, so the worker sees the end of input.
    drop(store);
    if let Some((handle, task)) = worker {
        stop_worker(handle, task).await;
    }

    result
}

/// Reads commands from `input` until `quit` or end of input.
///
/// Bad commands are reported on `out` and the loop continues.
pub async fn run_session<R, W>(store: &mut CartStore, input: R, out: &mut W) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Type `help` for commands.")?;
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let outcome = line
            .parse::<Command>()
            .and_then(|command| commands::execute(store, command, out));

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) if e.is_recoverable() => writeln!(out, "error: {}", e)?,
            Err(e) => return Err(e),
        }
        out.flush()?;
    }

    Ok(())
}

fn token_provider(args: &Args) -> Arc<dyn TokenProvider> {
    match &args.token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => Arc::new(EnvToken::default()),
    }
}

async fn connect(
    config: &FolioConfig,
    tokens: Arc<dyn TokenProvider>,
) -> CliResult<(CartStore, SyncWorkerHandle, JoinHandle<()>)> {
    let remote: Arc<dyn RemoteCart> = Arc::new(HttpRemoteCart::new(config, tokens)?);
    let (outbox, receiver) = Outbox::channel();
    let mut store = CartStore::with_outbox(outbox);

    if config.sync.hydrate_on_start {
        store.hydrate_from(remote.as_ref()).await;
    }

    let (handle, task) = SyncWorker::spawn(remote, receiver);
    Ok((store, handle, task))
}

async fn stop_worker(handle: SyncWorkerHandle, task: JoinHandle<()>) {
    if let Err(e) = handle.shutdown().await {
        debug!(error = %e, "Sync worker already stopped");
    }
    if let Err(e) = task.await {
        warn!(error = %e, "Sync worker task failed");
    }

    let stats = handle.stats();
    info!(
        applied = stats.applied,
        failed = stats.failed,
        auth_failures = stats.auth_failures,
        "Sync finished"
    );
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=folio_sync=trace` - Show outbox traffic
/// - Default: `info,folio=debug`
///
/// Logs go to stderr so they never interleave with cart tables on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,folio=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
