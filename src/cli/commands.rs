//! Subcommand handlers for convert, subsets and config actions.

use std::path::{Path, PathBuf};

use super::args::{ConfigAction, ConvertArgs};
use crate::config::{default_path, Config, ConfigError, DEFAULT_CONFIG};
use crate::convert::{ConversionRequest, ConversionService, Mode};
use crate::error::{MosaicError, RenderError};
use crate::glyph::{FontRenderer, RenderParams, Subset};
use crate::io::{load_image, save_image};
use crate::raster::RasterBuffer;

/// Errors reported by the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Mosaic(#[from] MosaicError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("ASCII art needs a font: pass --font or set [render] font in the config file")]
    MissingFont,

    #[error("config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Renderer for conversions that never draw glyphs.
fn no_font(ch: char, _: &RenderParams) -> Result<RasterBuffer, RenderError> {
    Err(RenderError::FontLoad(format!(
        "no font loaded to draw {:?}",
        ch
    )))
}

/// Character subset chosen by the flags, falling back to the config file.
fn resolve_subset(args: &ConvertArgs, config: &Config) -> Option<String> {
    if let Some(chars) = &args.chars {
        return Some(chars.clone());
    }
    match args.charset {
        Some(charset) => Subset::from(charset).chars().map(str::to_string),
        None => config.ascii.subset.clone(),
    }
}

/// Build the conversion request and the service that runs it.
fn prepare(
    args: &ConvertArgs,
    config: &Config,
) -> Result<(ConversionService, ConversionRequest), CliError> {
    let mode = Mode::from(args.mode);
    match mode {
        Mode::AsciiArt => {
            let font = args
                .font
                .as_ref()
                .or(config.render.font.as_ref())
                .ok_or(CliError::MissingFont)?;
            let renderer = FontRenderer::from_path(font)?;
            let params = renderer.params(args.size.unwrap_or(config.render.size));
            let mut request = ConversionRequest::new(mode, params)
                .with_color(args.color.unwrap_or(config.ascii.color));
            request.subset = resolve_subset(args, config);
            request.target = args.region;
            Ok((ConversionService::new(renderer), request))
        }
        Mode::Pixelization => {
            let block = args.size.unwrap_or_else(|| config.block_size());
            let mut request = ConversionRequest::new(mode, RenderParams::new("pixelize", block, block));
            request.target = args.region;
            Ok((ConversionService::new(no_font), request))
        }
    }
}

/// Convert the input file and write the result.
pub fn run_convert(args: &ConvertArgs, config: &Config) -> Result<(), CliError> {
    let (service, request) = prepare(args, config)?;
    let source = load_image(&args.input)?;
    let output = service.convert(&request, Some(&source))?;
    save_image(&output, &args.output)?;

    println!(
        "Wrote {} ({}x{}, {})",
        args.output.display(),
        output.width(),
        output.height(),
        request.mode
    );
    Ok(())
}

/// Print the built-in character sets.
pub fn list_subsets() {
    println!("Built-in character sets:");
    for subset in [Subset::All, Subset::Standard, Subset::Minimal] {
        match subset.chars() {
            Some(chars) => println!("  {:<10} \"{}\"", subset.name(), chars),
            None => println!("  {:<10} every printable ASCII character", subset.name()),
        }
    }
    println!();
    println!("Use --charset <name> or --chars <characters> to select one.");
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, path: Option<&Path>) -> Result<(), CliError> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(default_path);
    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&config_path))?;
            println!("Current configuration:");
            match &config.render.font {
                Some(font) => println!("  Font: {}", font.display()),
                None => println!("  Font: (not set)"),
            }
            println!("  Size: {}", config.render.size);
            match &config.ascii.subset {
                Some(subset) => println!("  Subset: \"{}\"", subset),
                None => println!("  Subset: all printable characters"),
            }
            println!("  Color: {}", if config.ascii.color { "yes" } else { "no" });
            println!("  Pixelize block size: {}", config.block_size());
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => {
            if config_path.exists() {
                return Err(CliError::ConfigExists(config_path));
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| CliError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|source| CliError::Write {
                path: config_path.clone(),
                source,
            })?;

            println!("Created config file: {}", config_path.display());
            Ok(())
        }
    }
}
