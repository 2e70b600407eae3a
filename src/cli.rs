use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Create, edit and extract colour palettes for preferences (.tps) files.
#[derive(Parser, Debug)]
#[command(name = "tps-palettes", version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a palette from an image and print it as a <color-palette> fragment
    Extract {
        /// Path to the input image
        image: PathBuf,

        /// Number of colours to extract (1-20). Remembered for next time.
        #[arg(short = 'n', long = "colors")]
        colors: Option<usize>,

        /// Palette name (defaults to the image filename stem)
        #[arg(long)]
        name: Option<String>,

        /// Palette type id
        #[arg(short, long, default_value = "regular")]
        r#type: String,
    },

    /// Validate a preferences file or a palette fragment and list its palettes
    Import {
        /// A .tps document or a <color-palette> fragment
        file: PathBuf,
    },

    /// Replace the palettes inside a preferences file with the given fragments
    Export {
        /// The .tps document to update
        tps: PathBuf,

        /// <color-palette> fragment files to write into it
        #[arg(required = true)]
        palettes: Vec<PathBuf>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Edit a palette fragment interactively
    Edit {
        /// Fragment file (created on first write if missing)
        file: PathBuf,
    },
}
