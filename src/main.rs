// ABOUTME: Entry point for the tagkeep CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, LabelArgs, SecretCommand, TagCommand};
use std::env;
use std::path::PathBuf;
use tagkeep::commands;
use tagkeep::config::{self, Config};
use tagkeep::error::{Error, Result};
use tagkeep::output::Output;
use tagkeep::runtime::{BollardRuntime, RuntimeErrorKind};
use tagkeep::secret::{SecretData, SecretManager, SecretManagerError, SecretSpec};
use tagkeep::state::StateStore;
use tagkeep::tag::{TagManager, TagSpec};
use tagkeep::types::Labels;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.output);

    if let Err(e) = run(cli.command, output.clone()).await {
        output.error(&e.to_string());
        if let Error::Runtime(runtime) = &e
            && runtime.kind() == RuntimeErrorKind::NoRuntimeFound
        {
            output.warning("set `runtime` or `socket` in tagkeep.yml to skip detection");
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands, mut output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            output.success("Created tagkeep.yml");
            Ok(())
        }
        Commands::Tag(command) => {
            output.start_timer();
            let config = Config::discover(&cwd)?;
            run_tag(command, &config, &output).await
        }
        Commands::Secret(command) => {
            output.start_timer();
            let config = Config::discover(&cwd)?;
            run_secret(command, &config, &output).await
        }
    }
}

async fn run_tag(command: TagCommand, config: &Config, output: &Output) -> Result<()> {
    let store = StateStore::new(&config.state_dir);

    if let TagCommand::Show { name } = &command {
        commands::show_tag(&store, name, output)?;
        return Ok(());
    }

    let runtime = commands::connect_local(config, output).await?;

    match command {
        TagCommand::Apply {
            name,
            triggers,
            labels,
            force,
        } => {
            let mut spec = TagSpec::new(&name)?;
            spec.pull_triggers.extend(triggers);
            spec.labels = collect_labels(labels);

            let manager = TagManager::new(runtime).with_auth(config.auth_for(&spec.name)?);
            commands::apply_tag(&manager, &store, spec, force, output).await?;
        }
        TagCommand::Refresh { name } => {
            let manager = tag_manager(runtime, config, &name)?;
            commands::refresh_tag(&manager, &store, &name, output).await?;
        }
        TagCommand::Destroy { name } => {
            let manager = tag_manager(runtime, config, &name)?;
            commands::destroy_tag(&manager, &store, &name, output).await?;
        }
        TagCommand::Show { .. } => {}
    }
    Ok(())
}

fn tag_manager(
    runtime: BollardRuntime,
    config: &Config,
    name: &str,
) -> Result<TagManager<BollardRuntime>> {
    let spec = TagSpec::new(name)?;
    Ok(TagManager::new(runtime).with_auth(config.auth_for(&spec.name)?))
}

async fn run_secret(command: SecretCommand, config: &Config, output: &Output) -> Result<()> {
    let store = StateStore::new(&config.state_dir);

    if let SecretCommand::Show { name } = &command {
        commands::show_secret(&store, name, output)?;
        return Ok(());
    }

    let manager = SecretManager::new(commands::connect_local(config, output).await?);

    match command {
        SecretCommand::Create {
            name,
            data,
            data_file,
            labels,
        } => {
            let data = read_secret_data(data, data_file)?;
            let spec = SecretSpec {
                name,
                data,
                labels: collect_labels(labels),
            };
            commands::create_secret(&manager, &store, spec, output).await?;
        }
        SecretCommand::Refresh { name } => {
            commands::refresh_secret(&manager, &store, &name, output).await?;
        }
        SecretCommand::Destroy { name } => {
            commands::destroy_secret(&manager, &store, &name, output).await?;
        }
        SecretCommand::Show { .. } => {}
    }
    Ok(())
}

fn read_secret_data(data: Option<String>, data_file: Option<PathBuf>) -> Result<SecretData> {
    let decoded = match (data, data_file) {
        (Some(encoded), _) => SecretData::from_base64(encoded.trim()),
        (None, Some(path)) => SecretData::from_bytes(&std::fs::read(&path)?),
        (None, None) => {
            return Err(Error::InvalidConfig(
                "secret data requires --data or --data-file".to_string(),
            ));
        }
    };
    decoded.map_err(|e| Error::Secret(SecretManagerError::from(e)))
}

fn collect_labels(args: LabelArgs) -> Labels {
    args.labels.into_iter().collect()
}
