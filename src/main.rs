use color_eyre::Result;
use clap::Parser;
use std::io;
use todo_tui::{Config, Database, Profile, cli::{Cli, Commands}};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    // --dev keeps a separate data directory
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    let config = Config::load_with_profile(profile, cli.db.as_deref(), cli.verbose)?;
    // Logging is best effort; only storage and terminal failures are fatal
    todo_tui::logging::init_tracing_or_disable(&config.log_path, &config.log_level);
    tracing::info!(
        profile = ?config.profile,
        database = %config.database_path.display(),
        "starting"
    );

    let db = Database::new(&config.database_path)?;

    match cli.command {
        None | Some(Commands::Tui) => {
            todo_tui::tui::run(db, config.theme)?;
        }
        Some(Commands::Add { title, tag }) => {
            todo_tui::cli::handle_add(&title, tag, &db, &mut io::stdout().lock())?;
        }
        Some(Commands::List { tag, json }) => {
            todo_tui::cli::handle_list(tag, json, &db, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}
