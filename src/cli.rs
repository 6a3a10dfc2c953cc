use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use crate::storage::FileStore;

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArguments),
    /// Initialize the data file from the template dataset
    Seed(SeedArguments),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArguments {
    /// Bind address
    #[arg(long, env = "PICKADATE_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// Data file path (defaults to ~/.pick-a-date/date-ideas.json)
    #[arg(long, env = "PICKADATE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Template dataset used to bootstrap the data file on first run
    #[arg(
        long,
        env = "PICKADATE_TEMPLATE_FILE",
        default_value = "data/date-ideas-template.json"
    )]
    pub template_file: PathBuf,

    /// Directory of built client files to serve (production mode)
    #[arg(long, env = "PICKADATE_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl ServeArguments {
    pub fn resolved_data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(FileStore::default_data_path)
    }

    /// Validate CLI/environment-derived arguments.
    pub fn validate(&self) -> Result<(), String> {
        self.addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid PICKADATE_ADDR '{}': {e}", self.addr))?;
        if let Some(dir) = &self.static_dir {
            if !dir.is_dir() {
                return Err(format!(
                    "PICKADATE_STATIC_DIR '{}' is not a directory",
                    dir.display()
                ));
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct SeedArguments {
    /// Data file path (defaults to ~/.pick-a-date/date-ideas.json)
    #[arg(long, env = "PICKADATE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Template dataset to copy into place
    #[arg(
        long,
        env = "PICKADATE_TEMPLATE_FILE",
        default_value = "data/date-ideas-template.json"
    )]
    pub template_file: PathBuf,

    /// Overwrite an existing data file
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

impl SeedArguments {
    pub fn resolved_data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(FileStore::default_data_path)
    }
}
