use archi_core::ArtifactType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate, refine and promote software design documents with an LLM
#[derive(Parser, Debug)]
#[command(name = "llm-architect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file, applied before environment variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the draft and result slots (overrides ARCHI_OUTCOMES_DIR)
    #[arg(short, long, global = true)]
    pub outcomes_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a document and store it as the draft
    Generate {
        /// user-stories, data-model or system-design
        artifact: ArtifactType,

        /// Free-text requirements (optional for data-model and system-design)
        requirements: Vec<String>,

        /// Extra guidance for the model
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Revise the stored draft and print the revision
    Modify {
        artifact: ArtifactType,

        /// What to change
        #[arg(required = true)]
        instructions: Vec<String>,

        /// Store the revision as the new draft
        #[arg(long)]
        save: bool,
    },

    /// Print a stored document
    Show {
        artifact: ArtifactType,

        /// Show the result slot instead of the draft
        #[arg(long)]
        result: bool,

        /// Render as Markdown instead of JSON
        #[arg(long)]
        markdown: bool,
    },

    /// Promote the current draft to the result slot
    Promote { artifact: ArtifactType },

    /// Generate user stories, data model and system design in one run
    Design {
        #[arg(required = true)]
        requirements: Vec<String>,
    },

    /// Print the effective configuration
    Config,
}
