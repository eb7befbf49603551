use clap::{Parser, Subcommand};
use snafu::{prelude::*, Whatever};
use to_focus::domain::entity::{Task, TaskId};
use to_focus::domain::timer::{TimerState, WorkerError};
use to_focus::domain::todo::TaskFilter;
use to_focus::domain::ApplicationCore;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line typed into the session.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Add a pending task
    Add {
        /// Title of the task
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Optional description of the task
        #[arg(short, long, num_args = 1..)]
        description: Vec<String>,
    },
    /// Mark a task as done
    Done { id: u64 },
    /// Mark a task as pending again
    Undone { id: u64 },
    /// Remove a task
    Remove { id: u64 },
    /// List tasks, pending ones first
    List {
        /// Only show pending tasks
        #[arg(short, long, conflicts_with = "done")]
        pending: bool,
        /// Only show finished tasks
        #[arg(short, long)]
        done: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Credit following work phases to a task
    Focus { id: u64 },
    /// Stop crediting work phases to any task
    Unfocus,
    /// Start the armed phase
    Start,
    /// Interrupt the running phase
    Stop,
    /// Show the timer's current status
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// An interactive session reading commands from the standard input.
pub struct Session {
    core: ApplicationCore,
}

impl Session {
    pub fn new(core: ApplicationCore) -> Self {
        Self { core }
    }

    /// Serve commands until `quit` or the end of input, then shut the timer
    /// down.
    pub async fn run(self) -> Result<(), Whatever> {
        self.core
            .timer
            .on_done(Box::new(|phase| println!("{phase} finished")))
            .await
            .whatever_context("Could not register completion callback")?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = lines
                .next_line()
                .await
                .whatever_context("Could not read from standard input")?;
            let Some(line) = line else {
                break;
            };

            if line.trim().is_empty() {
                continue;
            }

            let command = match Line::try_parse_from(line.split_whitespace()) {
                Ok(line) => line.command,
                Err(err) => {
                    err.print().whatever_context("Could not print usage")?;
                    continue;
                }
            };

            if let Flow::Quit = self.execute(command).await? {
                break;
            }
        }

        self.core
            .timer
            .shutdown()
            .await
            .whatever_context("Could not shut the timer down")?;
        tracing::info!("Session closed");
        Ok(())
    }

    async fn execute(&self, command: Command) -> Result<Flow, Whatever> {
        let tasks = &self.core.tasks;
        let timer = &self.core.timer;

        match command {
            Command::Add { title, description } => {
                let task = tasks.add(title.join(" "), description.join(" ")).await;
                println!("{}", render_task(&task));
            }
            Command::Done { id } | Command::Undone { id } => {
                let done = matches!(command, Command::Done { .. });
                match tasks.switch(TaskId::from(id), done).await {
                    Ok(task) => println!("{}", render_task(&task)),
                    Err(err) => println!("{err}"),
                }
            }
            Command::Remove { id } => tasks.delete(TaskId::from(id)).await,
            Command::List {
                pending,
                done,
                json,
            } => {
                let filter = match (pending, done) {
                    (true, _) => TaskFilter::Pending,
                    (_, true) => TaskFilter::Done,
                    _ => TaskFilter::All,
                };
                let list = tasks.list(filter).await;
                if json {
                    let content = serde_json::to_string_pretty(&list)
                        .whatever_context("Could not serialize tasks")?;
                    println!("{content}");
                } else {
                    list.iter().for_each(|task| println!("{}", render_task(task)));
                }
            }
            Command::Focus { id } => match timer.focus(TaskId::from(id)).await {
                Ok(task) => println!("Focusing on {}", render_task(&task)),
                Err(err @ WorkerError::TaskNotFound { .. }) => println!("{err}"),
                Err(err) => return Err(err).whatever_context("Could not focus on task"),
            },
            Command::Unfocus => timer
                .clear_focus()
                .await
                .whatever_context("Could not clear focus")?,
            Command::Start => {
                let started = timer.start().await.whatever_context("Could not start")?;
                if !started {
                    println!("Timer is already running");
                }
            }
            Command::Stop => {
                let stopped = timer.stop().await.whatever_context("Could not stop")?;
                if !stopped {
                    println!("Timer is not running");
                }
            }
            Command::Status { json } => {
                let state = timer.snapshot();
                if json {
                    let content = serde_json::to_string_pretty(&state)
                        .whatever_context("Could not serialize timer state")?;
                    println!("{content}");
                } else {
                    println!("{}", render_state(&state));
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }
}

fn render_task(task: &Task) -> String {
    let mark = if task.is_done() { 'x' } else { ' ' };
    let mut line = format!(
        "[{mark}] {} {} ({} finished)",
        task.id(),
        task.title(),
        task.finished_intervals()
    );
    if !task.description().is_empty() {
        line.push_str(": ");
        line.push_str(task.description());
    }
    line
}

fn render_state(state: &TimerState) -> String {
    let mut line = format!(
        "{} {} (work {})",
        state.phase(),
        state.formatted(),
        state.work_in_line()
    );
    if let Some(task) = state.focus() {
        line.push_str(&format!(", focusing on {} {}", task.id(), task.title()));
    }
    line
}
