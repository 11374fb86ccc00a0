//! CLI argument definitions using clap.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tierlist::persistence::FileBlobStore;
use tierlist::store::HttpStore;
use tierlist::{MergePolicy, Session, SessionConfig};

/// Server the client commands talk to when none is given.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// Directory client state is saved in when none is given.
pub const DEFAULT_STATE_DIR: &str = ".tierlist";

/// Tierlist: sort images into five tiers
#[derive(Parser)]
#[command(name = "tierlist")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the image server
    Serve {
        /// Directory images are stored in (created if missing)
        #[arg(short, long, env = "TIERLIST_IMAGES_DIR", default_value = "images")]
        images_dir: PathBuf,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port for web server
        #[arg(short, long, env = "TIERLIST_PORT", default_value = "3000")]
        port: u16,

        /// Dataset id to report instead of one derived from the directory
        #[arg(long)]
        dataset: Option<String>,
    },

    /// Rate images one at a time in the terminal
    Rate {
        #[command(flatten)]
        client: ClientArgs,

        /// Open each image in the system viewer
        #[arg(long)]
        open: bool,
    },

    /// Show rating progress and tier counts
    Status {
        #[command(flatten)]
        client: ClientArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload image files and add them to the session
    Upload {
        #[command(flatten)]
        client: ClientArgs,

        /// Image files to upload
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Write the tiers to a JSON file
    Export {
        #[command(flatten)]
        client: ClientArgs,

        /// Output path
        #[arg(short, long, default_value = tierlist::session::DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },

    /// Forget all ratings and start over
    Reset {
        #[command(flatten)]
        client: ClientArgs,

        /// Also delete every image on the server
        #[arg(long)]
        delete_images: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Options shared by every command that works on a rating session.
#[derive(Args, Clone, Debug)]
pub struct ClientArgs {
    /// Image server URL
    #[arg(long, env = "TIERLIST_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// Directory client state is saved in
    #[arg(long, env = "TIERLIST_STATE_DIR", default_value = DEFAULT_STATE_DIR)]
    pub state_dir: PathBuf,

    /// Namespace to use instead of the server's dataset id
    #[arg(long)]
    pub namespace: Option<String>,

    /// How saved state and the server listing are combined
    #[arg(long, default_value = "prefer-local")]
    pub merge: MergePolicy,

    /// Allow undoing tier moves made in review
    #[arg(long)]
    pub undoable_moves: bool,
}

impl ClientArgs {
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new()
            .with_merge_policy(self.merge)
            .with_undoable_moves(self.undoable_moves);
        if let Some(namespace) = &self.namespace {
            config = config.with_namespace(namespace.clone());
        }
        config
    }

    /// Connect to the server and restore the saved session.
    pub fn open_session(&self) -> tierlist::Result<(Session, HttpStore)> {
        let store = HttpStore::new(&self.server)?;
        let session = Session::open(
            store.clone(),
            FileBlobStore::new(&self.state_dir),
            self.session_config(),
        );
        Ok((session, store))
    }
}
