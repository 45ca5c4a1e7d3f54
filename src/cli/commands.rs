use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agenda", about = concat!("agenda v", env!("CARGO_PKG_VERSION"), " - meetings, to-dos and a local inbox"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a default agenda.toml
    Init(InitArgs),
    /// Schedule and review meetings
    #[command(subcommand)]
    Calendar(CalendarCmd),
    /// Manage the to-do list
    #[command(subcommand)]
    Tasks(TasksCmd),
    /// Send to and read the local inbox
    #[command(subcommand)]
    Inbox(InboxCmd),
    /// View or prune the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing agenda.toml
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum CalendarCmd {
    /// Schedule a meeting from explicit fields
    Add(EventAddArgs),
    /// Schedule a meeting from a sentence ("tomorrow at 3pm with Ana about budget")
    Say(SayArgs),
    /// List all meetings
    List,
    /// Meetings starting in the next few minutes
    Next(NextArgs),
    /// Meetings in the coming seven days
    Week,
    /// Readable summary of the coming week
    Summary,
    /// Delete a meeting by ID
    Delete(EventIdArg),
    /// Delete every meeting
    Clear,
}

#[derive(Args)]
pub struct EventAddArgs {
    /// Meeting title
    pub title: String,
    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
    /// Time (HH:MM, 24-hour)
    #[arg(long)]
    pub time: String,
    /// Free-text description
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct SayArgs {
    /// The sentence; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

#[derive(Args)]
pub struct NextArgs {
    /// Window in minutes (default: calendar.reminder_minutes)
    #[arg(long)]
    pub minutes: Option<i64>,
}

#[derive(Args)]
pub struct EventIdArg {
    /// Meeting ID
    pub id: u64,
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum TasksCmd {
    /// Add a task
    Add(TaskAddArgs),
    /// List pending tasks
    List(TaskListArgs),
    /// Mark a task done
    Done(OrdinalArg),
    /// Delete a task
    Delete(OrdinalArg),
    /// Delete every task
    Clear,
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Task text
    pub text: String,
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Include completed tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct OrdinalArg {
    /// Task number as shown by `tasks list`
    pub number: usize,
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum InboxCmd {
    /// Store an email in the local inbox
    Send(SendArgs),
    /// Show the most recent emails
    Read(ReadArgs),
}

#[derive(Args)]
pub struct SendArgs {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

#[derive(Args)]
pub struct ReadArgs {
    /// How many emails to show (default: inbox.read_limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove every entry, not just those older than 30 days
    #[arg(long)]
    pub all: bool,
}
