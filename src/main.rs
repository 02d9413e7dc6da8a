use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use deft::cli::{Cli, Commands};
use deft::config::ConfigOverrides;
use deft::error::UserError;
use deft::storage::FileStorage;
use deft::{commands, output};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        // Expected user errors get a clean one-line message; anything else
        // surfaces with its full error chain.
        if let Some(user_error) = e.downcast_ref::<UserError>() {
            output::error(&user_error.to_string());
            process::exit(1);
        }
        eprintln!("{} {e:?}", "error:".red().bold());
        process::exit(2);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if cli.quiet {
        output::set_verbosity(output::Verbosity::Quiet);
    } else if cli.verbose {
        output::set_verbosity(output::Verbosity::Verbose);
    }

    // The storage root is injected here and threaded through everything;
    // nothing below this point consults the process working directory.
    let root = match cli.directory {
        Some(directory) => directory,
        None => std::env::current_dir().context("could not determine working directory")?,
    };
    let storage = FileStorage::new(root);

    match cli.command {
        Commands::Init {
            datadir,
            initial_status,
        } => commands::init::execute(
            storage,
            &ConfigOverrides {
                datadir,
                initial_status,
            },
        ),
        Commands::Configure { initial_status } => commands::configure::execute(
            storage,
            &ConfigOverrides {
                datadir: None,
                initial_status,
            },
        ),
        Commands::Create {
            name,
            status,
            priority,
            description,
        } => commands::create::execute(
            storage,
            &name,
            status.as_deref(),
            priority,
            description.as_deref(),
        ),
        Commands::List { statuses, csv } => commands::list::execute(storage, &statuses, csv),
        Commands::Status { name, status } => {
            commands::status::execute(storage, &name, status.as_deref())
        }
        Commands::Priority { name, priority } => {
            commands::priority::execute(storage, &name, priority)
        }
        Commands::Description {
            name,
            edit,
            file,
            description,
        } => commands::description::execute(storage, &name, description.as_deref(), edit, file),
        Commands::Properties {
            name,
            edit,
            file,
            set,
        } => commands::properties::execute(storage, &name, &set, edit, file),
        Commands::Purge { names } => commands::purge::execute(storage, &names),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
