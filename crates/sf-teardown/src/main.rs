//! sf-teardown: delete every AWS resource of an installation

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sf_teardown::aws::{AwsClients, AwsContext, classify_anyhow_error, get_current_account_id};
use sf_teardown::config::{AwsConfig, TeardownConfig, Tuning};
use sf_teardown::teardown::{LogReporter, Orchestrator, scan_installation};
use sf_teardown_common::InstallationId;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sf-teardown")]
#[command(about = "Delete every AWS resource of an analytics installation")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Which installation, and where
#[derive(clap::Args, Debug)]
struct TargetArgs {
    /// AWS region the installation lives in
    #[arg(long, env = "AWS_REGION")]
    region: String,

    /// AWS profile to use (overrides the default credential chain)
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Installation id every resource name is derived from
    #[arg(long, env = "SF_INSTALLATION_ID")]
    installation_id: InstallationId,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Delete the installation's stacks and residual resources
    Teardown {
        #[command(flatten)]
        target: TargetArgs,

        /// JSON file overriding delays, purge and sweep settings
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List what a teardown would delete, without deleting anything
    Scan {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Table,
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if let Some(hint) = classify_anyhow_error(e).suggestion() {
        let _ = writeln!(stderr, "\n\x1b[36mHint:\x1b[0m {hint}");
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    } else {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\n\x1b[2mBacktrace:\x1b[0m\n{backtrace}");
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
                .add_directive("aws_config=warn".parse()?)
                .add_directive("aws_smithy_runtime=warn".parse()?),
        )
        .init();

    match args.command {
        Command::Teardown { target, config } => {
            let tuning = match config {
                Some(path) => Tuning::load(&path)?,
                None => Tuning::default(),
            };
            let config = TeardownConfig {
                installation_id: target.installation_id,
                aws: AwsConfig {
                    region: target.region,
                    aws_profile: target.profile,
                },
                tuning,
            };
            teardown(&config).await
        }
        Command::Scan { target, format } => scan(target, format).await,
    }
}

async fn connect(region: &str, profile: Option<&str>) -> Result<AwsClients> {
    let ctx = AwsContext::with_profile(region, profile).await;
    let account_id = get_current_account_id(ctx.sdk_config()).await?;
    Ok(AwsClients::new(&ctx, account_id))
}

async fn teardown(config: &TeardownConfig) -> Result<()> {
    let clients = connect(config.region(), config.aws_profile()).await?;

    let summary = Orchestrator::new(&clients, &config.tuning, &LogReporter)
        .run(&config.installation_id)
        .await?;

    if summary.was_noop() {
        info!(installation_id = %config.installation_id, "Nothing left to delete");
    } else {
        info!(
            installation_id = %config.installation_id,
            stacks_deleted = summary.stacks_deleted.len(),
            residual = summary.residual.total(),
            "Installation removed"
        );
    }
    Ok(())
}

async fn scan(target: TargetArgs, format: OutputFormat) -> Result<()> {
    let clients = connect(&target.region, target.profile.as_deref()).await?;
    let sweep = Tuning::default().sweep;
    let report = scan_installation(&clients, &sweep, &target.installation_id).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table if report.is_empty() => {
            println!("No resources found for installation {}", target.installation_id);
        }
        OutputFormat::Table => println!("{}", report.to_table()),
    }
    Ok(())
}
