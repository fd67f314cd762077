use std::path::PathBuf;

use clap::{Parser, Subcommand};
use copyx::CopyFormat;

#[derive(Parser)]
#[command(name = "copyx", about = "Copy text, HTML, JSON or images to the clipboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Copy a single value
    Copy {
        /// Value to copy (read from stdin when neither this nor --file is given)
        value: Option<String>,

        /// Read the value from a file instead
        #[arg(long, conflicts_with = "value")]
        file: Option<PathBuf>,

        /// Clipboard format: text, html, json or image
        #[arg(long, default_value = "text")]
        format: CopyFormat,

        /// Fail on the first rejected strategy instead of degrading
        #[arg(long)]
        no_fallback: bool,

        /// MIME type for binary image copies
        #[arg(long)]
        mime_type: Option<String>,

        /// Also run the legacy OSC 52 copy after a successful HTML copy
        #[arg(long)]
        force_legacy: bool,
    },

    /// Run the demo buttons (text, HTML, JSON, image)
    Demo {
        /// How long the "Copied!" state lasts
        #[arg(long, default_value_t = 2000)]
        reset_delay_ms: u64,

        /// Record every copied value
        #[arg(long)]
        keep_history: bool,

        /// Image file for the image button (a built-in PNG otherwise)
        #[arg(long)]
        image: Option<PathBuf>,
    },
}
