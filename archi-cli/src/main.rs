use anyhow::Result;
use archi_artifact::FileArtifactStore;
use archi_cli::commands;
use archi_cli::serve::run_serve;
use archi_cli::{ArchitectConfig, Cli, Commands};
use archi_model::OpenAICompatibleClient;
use archi_workflow::ProjectDesigner;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

fn offline_designer(config: &ArchitectConfig) -> ProjectDesigner {
    let store = FileArtifactStore::new(&config.outcomes_dir);
    ProjectDesigner::new(Arc::new(store), Arc::new(commands::Offline), config.workflow_settings())
}

fn build_designer(config: &ArchitectConfig) -> Result<ProjectDesigner> {
    config.require_api_key()?;
    let llm = OpenAICompatibleClient::new(config.model_config())?;
    let store = FileArtifactStore::new(&config.outcomes_dir);
    Ok(ProjectDesigner::new(Arc::new(store), Arc::new(llm), config.workflow_settings()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match ArchitectConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "Configuration Error".red().bold(), e);
            std::process::exit(1);
        }
    };
    if let Some(dir) = cli.outcomes_dir {
        config.outcomes_dir = dir;
    }

    if let Err(e) = archi_telemetry::init_with_options(&config.telemetry_options()) {
        eprintln!("{}: {}", "Telemetry Warning".yellow(), e);
    }

    let output = match cli.command {
        Commands::Config => {
            println!("{}", "Configuration:".yellow().bold());
            print!("{}", toml::to_string_pretty(&config.redacted())?);
            println!("{}", "Configuration is valid!".green());
            return Ok(());
        }
        Commands::Serve { host, port } => {
            let designer = Arc::new(build_designer(&config)?);
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            return run_serve(designer, &host, port).await;
        }
        Commands::Generate { artifact, requirements, note } => {
            let designer = build_designer(&config)?;
            commands::generate(&designer, artifact, &requirements.join(" "), note).await?
        }
        Commands::Modify { artifact, instructions, save } => {
            let designer = build_designer(&config)?;
            commands::modify(&designer, artifact, &instructions.join(" "), save).await?
        }
        Commands::Show { artifact, result, markdown } => {
            let designer = offline_designer(&config);
            commands::show(&designer, artifact, result, markdown).await?
        }
        Commands::Promote { artifact } => {
            let designer = offline_designer(&config);
            commands::promote(&designer, artifact).await?
        }
        Commands::Design { requirements } => {
            let designer = build_designer(&config)?;
            commands::design(&designer, &requirements.join(" ")).await?
        }
    };

    print!("{output}");
    Ok(())
}
