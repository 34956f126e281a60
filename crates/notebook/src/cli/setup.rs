use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "notebook", bin_name = "notebook", version)]
#[command(about = "Manage locally stored notebook documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the `documents/` store
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List documents, most recently modified first
    #[command(alias = "ls")]
    List {
        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a document's content as JSON
    Show {
        id: String,

        /// Print metadata and content together
        #[arg(long)]
        full: bool,
    },

    /// Save content JSON under a name, creating or updating the document
    Save {
        /// Document name
        #[arg(short, long)]
        name: String,

        /// Existing document id; a new one is generated when omitted
        #[arg(long)]
        id: Option<String>,

        /// File with content JSON; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },

    /// Delete a document
    #[command(alias = "rm")]
    Delete { id: String },

    /// Print a fresh document id
    NewId,

    /// Repair leftovers of interrupted writes
    Doctor,
}
