use clap::{Args, Parser, Subcommand};

use crate::cli::output::parse_direction;
use crate::model::todo::Direction;

#[derive(Parser)]
#[command(name = "tdl", about = concat!("[x] todoshare v", env!("CARGO_PKG_VERSION"), " - one list, one link, everyone in sync"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// API root of the list server (default: config or http://localhost:8000/api)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// List token to use instead of the saved one
    #[arg(long, global = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new list on the server and make it current
    New,
    /// Open an existing list by token or share URL
    Open(OpenArgs),
    /// Print the share URL (or token) of the current list
    Share,
    /// List todos, highest rank first
    List(ListArgs),
    /// Add a todo
    Add(AddArgs),
    /// Edit a todo's fields
    Edit(EditArgs),
    /// Mark a todo done, or undone again
    Mark(IdArgs),
    /// Delete a todo
    Rm(IdArgs),
    /// Move a todo one step up or down
    Mv(MvArgs),
    /// Add or remove category labels
    Cat(CatCmd),
}

// ---------------------------------------------------------------------------
// Session args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct OpenArgs {
    /// List token, or a share URL ending in the token
    pub list: String,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only show todos with this category label
    #[arg(long)]
    pub category: Option<String>,
    /// Group todos under their category labels
    #[arg(long, conflicts_with = "category")]
    pub group: bool,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Short label (may be empty)
    pub name: String,
    /// Free-form body text
    #[arg(long, default_value = "")]
    pub text: String,
    /// Category label (repeatable)
    #[arg(long = "category", short = 'c')]
    pub categories: Vec<String>,
    /// Create the todo already done
    #[arg(long)]
    pub done: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Todo ID
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New body text
    #[arg(long)]
    pub text: Option<String>,
    /// Replace the category labels (repeatable)
    #[arg(long = "category", short = 'c')]
    pub categories: Vec<String>,
    /// Remove every category label
    #[arg(long, conflicts_with = "categories")]
    pub clear_categories: bool,
    /// Set the done flag (true or false)
    #[arg(long)]
    pub done: Option<bool>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Todo ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Todo ID
    pub id: String,
    /// Direction: up or down
    #[arg(value_parser = parse_direction)]
    pub direction: Direction,
}

#[derive(Args)]
pub struct CatCmd {
    #[command(subcommand)]
    pub action: CatAction,
}

#[derive(Subcommand)]
pub enum CatAction {
    /// List every category label in use
    Ls,
    /// Add a category label to a todo
    Add(CatArgs),
    /// Remove a category label (all occurrences) from a todo
    Rm(CatArgs),
}

#[derive(Args)]
pub struct CatArgs {
    /// Todo ID
    pub id: String,
    /// Category label
    pub label: String,
}
