//! kubectl-secretdata
//!
//! Entry point for the plugin. Parses flags, connects to the cluster, and
//! prints the decoded secrets once the whole result set is assembled.

use std::process::ExitCode;

use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kubectl_secretdata::{
    adapters::kube_source::KubeSecretSource, aggregator::find_secrets, cli::Cli, config::Config,
    render::{render, write_output},
    Result,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.log_json);

    let result = run(&cli)
        .await
        .and_then(|output| write_output(std::io::stdout().lock(), &output));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<String> {
    // Flags are validated before the cluster is touched
    let config = Config::from_cli(cli)?;
    debug!("Resolved configuration: {:?}", config);

    let source = KubeSecretSource::connect(&config.kube).await?;
    info!("Connected to Kubernetes API server");

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_signal(cancel.clone()));
    if let Some(timeout) = config.request_timeout {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            info!("Request timeout of {:?} reached", timeout);
            cancel.cancel();
        });
    }

    let result = find_secrets(&source, &config, &cancel).await;
    watcher.abort();

    render(&result?, config.output)
}

/// Initialize tracing subscriber
///
/// Logs go to stderr so stdout only carries the rendered secrets.
fn init_tracing(verbose: bool, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,kubectl_secretdata=debug,kube=info")
        } else {
            EnvFilter::new("warn")
        }
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init();
    }
}

/// Cancel `token` on SIGTERM or SIGINT
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            debug!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                debug!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received CTRL+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    token.cancel();
}
