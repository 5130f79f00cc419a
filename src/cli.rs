use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taskpad", version, about = "Terminal project and todo tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List projects and the active project's todos
    List,
    /// Add a new todo to the active project
    Add {
        /// Title of the todo
        title: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
        /// Free-form due date text
        #[arg(long)]
        due: Option<String>,
        /// Priority: Low, Medium or High (defaults to Low)
        #[arg(long)]
        priority: Option<String>,
        /// Optional notes
        #[arg(long)]
        notes: Option<String>,
        /// Target project by id or name instead of the active one
        #[arg(long)]
        project: Option<String>,
    },
    /// Complete a todo, removing it from its project
    Done {
        /// Todo id to complete
        todo_id: String,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    /// Launch the interactive TUI
    Tui,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a project and make it active
    Add {
        /// Project name
        name: String,
    },
    /// Delete a project and every todo in it
    Rm {
        /// Project id or name
        project: String,
    },
}
