use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Manage the todo list over the HTTP API", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the todo server
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:3000")]
    pub base_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show open todos, or finished ones with --completed
    List {
        #[arg(long)]
        completed: bool,
    },

    /// Add a todo
    Add {
        /// Todo text; words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Flip a todo between open and finished
    Toggle { id: i64 },

    /// Replace the text of a todo
    Edit {
        id: i64,

        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a todo
    Delete { id: i64 },

    /// Print the number of todos
    Count,
}
