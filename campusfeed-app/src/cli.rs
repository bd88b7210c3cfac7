use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse and manage the campus post feed from a terminal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the feed.
    List,
    /// Show the signed-in user.
    Whoami,
    /// Upload a photo or video and publish it.
    Post {
        /// The photo or video to upload.
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "")]
        caption: String,
    },
    /// Like a post, or take the like back.
    Like { id: u64 },
    /// Open a post's media, registering a view.
    View { id: u64 },
    /// Replace a post's caption.
    Edit {
        id: u64,
        #[arg(long)]
        caption: String,
    },
    /// Delete a post.
    Delete {
        id: u64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}
