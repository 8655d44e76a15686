//! CLI enum types for conversion mode and character set options.

use clap::ValueEnum;

use crate::convert::Mode;
use crate::glyph::Subset;

/// Conversion style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    /// Replace blocks with glyphs
    #[default]
    Ascii,
    /// Replace blocks with their average color
    Pixelize,
}

impl From<ModeArg> for Mode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Ascii => Mode::AsciiArt,
            ModeArg::Pixelize => Mode::Pixelization,
        }
    }
}

/// Built-in ASCII character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CharacterSet {
    /// Every printable character
    #[default]
    All,
    Standard,
    Minimal,
}

impl From<CharacterSet> for Subset {
    fn from(c: CharacterSet) -> Self {
        match c {
            CharacterSet::All => Subset::All,
            CharacterSet::Standard => Subset::Standard,
            CharacterSet::Minimal => Subset::Minimal,
        }
    }
}
