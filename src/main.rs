mod chat;
mod config;
mod convert;
mod error;
mod registry;
mod transcript;

use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;

use config::Config;
use convert::Converter;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "chat-export-to-transcript",
    about = "Prepare chat data to be processed by a sequence model"
)]
struct Args {
    /// The chat csv file to process
    #[structopt(name = "chatfile")]
    chatfile: PathBuf,

    /// Path to a TOML file overriding output locations
    #[structopt(short = "c", long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::from_args();
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::load(args.config.as_deref())?;

    let chat_file = std::fs::File::open(&args.chatfile)
        .with_context(|| format!("Failed to open chat file {}", args.chatfile.display()))?;
    log::info!("Reading {}", args.chatfile.display());

    let mut converter = Converter::new(std::io::stdout().lock(), config.progress_interval);

    {
        let mut transcript = transcript::open_append(&config.transcript).with_context(|| {
            format!("Failed to open transcript {}", config.transcript.display())
        })?;
        converter
            .transcribe(chat_file, &mut transcript)
            .with_context(|| format!("Failed to convert {}", args.chatfile.display()))?;
        transcript
            .flush()
            .context("Failed to flush transcript file")?;
    }

    let mut index_file = transcript::open_append(&config.index)
        .with_context(|| format!("Failed to open name index {}", config.index.display()))?;
    let speakers = converter
        .write_index(&mut index_file)
        .context("Failed to write name index file")?;
    index_file
        .flush()
        .context("Failed to flush name index file")?;

    log::info!(
        "Wrote {speakers} names to {} and transcript to {}",
        config.index.display(),
        config.transcript.display()
    );

    Ok(())
}
