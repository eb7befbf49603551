use std::sync::Arc;

use snafu::{prelude::*, Whatever};
use to_focus::adapter::config::{self, Configuration};
use to_focus::adapter::repository::{InMemoryTaskRepository, SettingsConfiguration};
use to_focus::domain::timer::SystemClock;
use to_focus::domain::ApplicationCore;

use crate::cli::Arguments;
use crate::session::Session;

const APP_NAME: &str = "to-focus";

pub async fn bootstrap(args: &Arguments) -> Result<Session, Whatever> {
    let configuration = configuration(args)?;
    let core = core(configuration).await?;
    Ok(Session::new(core))
}

fn configuration(args: &Arguments) -> Result<Arc<Configuration>, Whatever> {
    let res = match &args.config {
        Some(path) => config::load_with_path(path),
        None => config::load_with_xdg(APP_NAME),
    };

    let configuration = res.whatever_context("Could not load configuration")?;
    tracing::debug!(?configuration, "Loaded configuration");
    Ok(Arc::new(configuration))
}

async fn core(config: Arc<Configuration>) -> Result<ApplicationCore, Whatever> {
    let task_repository = Arc::new(InMemoryTaskRepository::new());
    let settings_repository = Arc::new(SettingsConfiguration::new(config));
    let clock = Arc::new(SystemClock);

    let core = ApplicationCore::setup(task_repository, settings_repository, clock)
        .await
        .whatever_context("Could not setup application core")?;

    Ok(core)
}
