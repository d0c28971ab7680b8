use std::{borrow::Cow, fmt};

use crate::sfnt::TableTag;

pub type FontResult<T> = anyhow::Result<T>;

#[derive(Debug)]
pub enum FontError {
    /// Ran past the end of the font program
    UnexpectedEof,

    /// The leading version tag or magic number is not one we recognize
    UnknownFormat {
        found: u32,
    },

    UnsupportedVersion {
        table: &'static str,
        version: u32,
    },

    MissingTable {
        tag: TableTag,
    },

    /// The sfnt container has no `glyf`/`loca` pair but does contain a `CFF `
    /// table. The whole font program should be parsed again as OpenType/CFF
    /// rather than abandoned
    RetryAsOpenType,

    /// A font collection was asked for a font it does not contain
    FontIndexOutOfBounds {
        index: u32,
        count: u32,
    },

    InvalidFont(Cow<'static, str>),

    UnrecognizedVariant {
        found: String,
        ty: &'static str,
    },

    /// Operand stack overflow
    StackOverflow,

    /// Operand stack underflow
    StackUnderflow,

    /// Subroutine calls nested too deep
    NestingLimitReached,

    InvalidSubroutineIndex {
        index: i32,
    },
}

impl FontError {
    pub fn invalid(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidFont(msg.into())
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of font data"),
            Self::UnknownFormat { found } => write!(f, "unknown font format: {:#010x}", found),
            Self::UnsupportedVersion { table, version } => {
                write!(f, "unsupported {} version: {:#x}", table, version)
            }
            Self::MissingTable { tag } => write!(f, "missing required table {:?}", tag),
            Self::RetryAsOpenType => write!(f, "font has CFF outlines, retry as OpenType"),
            Self::FontIndexOutOfBounds { index, count } => {
                write!(f, "font index {} out of bounds ({} fonts)", index, count)
            }
            Self::InvalidFont(msg) => write!(f, "invalid font: {}", msg),
            Self::UnrecognizedVariant { found, ty } => {
                write!(f, "unrecognized {}: {:?}", ty, found)
            }
            Self::StackOverflow => write!(f, "operand stack overflow"),
            Self::StackUnderflow => write!(f, "operand stack underflow"),
            Self::NestingLimitReached => write!(f, "subroutine nesting limit reached"),
            Self::InvalidSubroutineIndex { index } => {
                write!(f, "invalid subroutine index: {}", index)
            }
        }
    }
}

impl std::error::Error for FontError {}

/// Whether `err` carries the "parse again as OpenType" signal
pub fn is_retry_as_open_type(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<FontError>(),
        Some(FontError::RetryAsOpenType)
    )
}
