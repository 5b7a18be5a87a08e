use crate::commands::{
    run_dashboard, run_entry, run_export, run_session, DashboardArgs, EntryArgs, ExportArgs,
    SessionCommand,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruitdesk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "recruitdesk",
    about = "Recruitment CRM dashboards, report exports and recruiter entries from the command line",
    version
)]
struct Cli {
    /// Override CRM_API_BASE_URL for this invocation
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the report HTTP service (default command)
    Serve(ServeArgs),
    /// Fetch a role dashboard and print its summary
    Dashboard(DashboardArgs),
    /// Fetch a role dashboard and write a CSV, Excel or printable HTML report
    Export(ExportArgs),
    /// Validate and log a recruiter entry
    Entry(EntryArgs),
    /// Store or clear the signed-in user used for the x-user-id header
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Run an offline walkthrough of scoring, export and entry validation
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let base_url = cli.base_url.as_deref();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, base_url).await,
        Command::Dashboard(args) => run_dashboard(args, base_url).await,
        Command::Export(args) => run_export(args, base_url).await,
        Command::Entry(args) => run_entry(args, base_url).await,
        Command::Session { command } => run_session(command, base_url),
        Command::Demo(args) => run_demo(args),
    }
}
