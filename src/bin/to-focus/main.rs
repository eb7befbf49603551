mod cli;
mod session;
mod setup;

use clap::Parser;
use snafu::{prelude::*, Whatever};

use crate::cli::Arguments;

#[snafu::report]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Whatever> {
    let args = Arguments::parse();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(args.verbosity)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .whatever_context("Could not setup logger")?;

    let session = setup::bootstrap(&args).await?;

    session
        .run()
        .await
        .whatever_context("Session failed with fatal")?;

    Ok(())
}
