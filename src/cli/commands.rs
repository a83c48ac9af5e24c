use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qd", about = concat!("quickdo v", env!("CARGO_PKG_VERSION"), " - capture now, triage later"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (default: <config dir>/quickdo/config.toml)
    #[arg(long, global = true, env = "QD_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter config file
    Init(InitArgs),
    /// Capture a new task
    Add(AddArgs),
    /// Show overdue, due-soon and priority-A tasks
    Urgent,
    /// Show every open task with its line index
    List,
    /// Mark the task on a line done
    Done(DoneArgs),
    /// List configured templates
    Templates,
    /// Add or remove a template
    Template(TemplateCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Task file to point the config at
    #[arg(long, default_value = "~/todo.txt")]
    pub file: String,
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    pub text: Vec<String>,
    /// Priority letter A-Z
    #[arg(short, long)]
    pub priority: Option<String>,
    /// Tag the task due today
    #[arg(long)]
    pub today: bool,
    /// Template to apply, by index or name
    #[arg(short, long)]
    pub template: Option<String>,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Zero-based line index, as shown by `qd urgent` or `qd list`
    #[arg(allow_negative_numbers = true)]
    pub line: i64,
}

#[derive(Args)]
pub struct TemplateCmd {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Add a template
    Add(TemplateAddArgs),
    /// Remove a template by name
    Remove(TemplateRemoveArgs),
}

#[derive(Args)]
pub struct TemplateAddArgs {
    /// Template name
    pub name: String,
    /// Project to tag (repeatable)
    #[arg(long = "project")]
    pub projects: Vec<String>,
    /// Context to tag (repeatable)
    #[arg(long = "context")]
    pub contexts: Vec<String>,
    /// Default priority letter
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct TemplateRemoveArgs {
    /// Template name
    pub name: String,
}
