// dqt/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, RulesAction, ScheduleAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug dqt check ... to see evaluation details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let project_dir = cli.project_dir;
    tracing::debug!(?project_dir, "Resolved project directory");

    match cli.command {
        Commands::Check { data, dataset } => {
            commands::check::execute(project_dir, data, dataset).await?
        }
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(project_dir).await?,
            RulesAction::Toggle { id } => commands::rules::toggle(project_dir, id).await?,
            RulesAction::Test { id, value } => {
                commands::rules::test(project_dir, id, value).await?
            }
        },
        Commands::Schedule { action } => match action {
            ScheduleAction::Next {
                frequency,
                time,
                day,
                from,
            } => commands::schedule::next(frequency, time, day, from)?,
            ScheduleAction::List => commands::schedule::list(project_dir).await?,
            ScheduleAction::Run { id } => commands::schedule::run(project_dir, id).await?,
            ScheduleAction::Toggle { id } => commands::schedule::toggle(project_dir, id).await?,
            ScheduleAction::Upcoming { hours } => {
                commands::schedule::upcoming(project_dir, hours).await?
            }
        },
        Commands::History { limit } => commands::history::execute(project_dir, limit).await?,
    }

    Ok(())
}
