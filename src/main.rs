use anyhow::Result;
use blobber::app::App;
use blobber::models::{Fit, Format, UrlOptions};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "blobber")]
#[command(about = "Upload files to Blobber and build CDN URLs")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload files and print their metadata and CDN URLs as JSON.
    Upload {
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        client_id: Option<String>,

        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Print the CDN URL of an uploaded file.
    Url {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long)]
        client_id: Option<String>,

        #[command(flatten)]
        display: DisplayArgs,
    },
}

#[derive(Debug, Args)]
struct DisplayArgs {
    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long, value_parser = parse_fit_arg)]
    fit: Option<Fit>,

    #[arg(long, value_parser = parse_format_arg)]
    format: Option<Format>,
}

impl From<DisplayArgs> for UrlOptions {
    fn from(args: DisplayArgs) -> Self {
        UrlOptions {
            width: args.width,
            height: args.height,
            fit: args.fit,
            format: args.format,
        }
    }
}

fn parse_fit_arg(input: &str) -> std::result::Result<Fit, String> {
    input.parse()
}

fn parse_format_arg(input: &str) -> std::result::Result<Format, String> {
    input.parse()
}

async fn run(app: &App, command: Command) -> blobber::Result<()> {
    match command {
        Command::Upload {
            files,
            client_id,
            display,
        } => {
            let uploaded = app
                .upload_paths(&files, client_id.as_deref(), &display.into())
                .await?;
            println!("{}", serde_json::to_string_pretty(&uploaded)?);
        }
        Command::Url {
            id,
            client_id,
            display,
        } => {
            println!("{}", app.url(&id, client_id.as_deref(), &display.into())?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blobber=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match App::new() {
        Ok(app) => match run(&app, args.command).await {
            Ok(_) => {
                info!("Done");
                Ok(())
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}
