use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "batch-rename")]
#[command(author, version, long_about = None)]
#[command(about = "Rename files matching a regex, with dry-run preview and automatic rollback")]
pub struct Args {
    /// Root directory to search (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Regex matched against file names (prompted for when omitted)
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Replacement template; supports $1, ${name}, \1 and \g<name>
    #[arg(short, long, value_name = "TEMPLATE")]
    pub replace: Option<String>,

    /// Directory to exclude, repeatable or comma-separated
    #[arg(short, long, value_name = "DIR", value_delimiter = ',')]
    pub exclude: Vec<PathBuf>,

    /// Preview changes without modifying the filesystem
    #[arg(short, long, visible_alias = "dry-run")]
    pub dry: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Undo the renames recorded in a history file
    #[arg(long, value_name = "HISTORY_FILE", conflicts_with_all = ["pattern", "replace", "exclude"])]
    pub revert: Option<PathBuf>,

    /// Do not write a history file after renaming
    #[arg(long)]
    pub no_history: bool,
}
