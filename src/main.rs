mod cli;
mod commands;
mod logging;
mod model;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let _logger = match storage::log_dir().and_then(|dir| logging::init(&dir)) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("taskpad: file logging disabled: {err:#}");
            None
        }
    };

    let args = cli::Cli::parse();
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::List => commands::list(),
        cli::Command::Add {
            title,
            description,
            due,
            priority,
            notes,
            project,
        } => commands::add(title, description, due, priority, notes, project),
        cli::Command::Done { todo_id } => commands::done(todo_id),
        cli::Command::Project { command } => match command {
            cli::ProjectCommand::Add { name } => commands::project_add(name),
            cli::ProjectCommand::Rm { project } => commands::project_rm(project),
        },
        cli::Command::Tui => commands::tui(),
    }
}
