//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use super::enums::{CharacterSet, ModeArg};
use crate::raster::Rect;

/// Turns images into ASCII-art or pixel mosaics
#[derive(Parser, Debug)]
#[command(name = "ascii-mosaic")]
#[command(version, about = "Render images as ASCII-art or pixel mosaics", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert an image file
    Convert(ConvertArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List built-in character sets
    Subsets,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Source image
    pub input: PathBuf,

    /// Destination image; the format follows the extension
    #[arg(long, short)]
    pub output: PathBuf,

    /// Conversion style
    #[arg(long, short, default_value = "ascii")]
    pub mode: ModeArg,

    /// Font used to draw glyphs (overrides config)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Glyph width, or block size when pixelizing (overrides config)
    #[arg(long, short)]
    pub size: Option<u32>,

    /// Built-in character set
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Custom characters, lightest first
    #[arg(long, conflicts_with = "charset")]
    pub chars: Option<String>,

    /// Tint glyphs with the block's average color (--color=false forces monochrome)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub color: Option<bool>,

    /// Convert only this region, as X,Y,WIDTH,HEIGHT
    #[arg(long)]
    pub region: Option<Rect>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}
