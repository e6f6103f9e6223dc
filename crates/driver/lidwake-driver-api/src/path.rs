//! ACPI name segments and absolute namespace paths.
//!
//! ACPI names are composed of 4-byte segments. Source-level names may be
//! shorter and are padded with `_` (so `\_SB.LID0` and `\_SB_.LID0` name the
//! same object). Paths hold up to 16 segments inline, enough for all
//! practical namespace depths.

use core::fmt;

/// A 4-byte ACPI name segment (e.g., `_SB_`, `LID0`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameSeg(pub [u8; 4]);

impl NameSeg {
    /// Parses one segment of a dotted path, padding short names with `_`.
    pub fn parse(name: &str) -> Result<Self, PathError> {
        let bytes = name.as_bytes();
        if bytes.is_empty() {
            return Err(PathError::EmptySegment);
        }
        if bytes.len() > 4 {
            return Err(PathError::SegmentTooLong);
        }

        let lead_ok = bytes[0].is_ascii_uppercase() || bytes[0] == b'_';
        let rest_ok = bytes[1..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || *b == b'_');
        if !lead_ok || !rest_ok {
            return Err(PathError::InvalidCharacter);
        }

        let mut seg = [b'_'; 4];
        seg[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(seg))
    }

    /// Returns the name as a string (ACPI names are always ASCII).
    #[must_use]
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.0).unwrap_or("")
    }
}

impl fmt::Debug for NameSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameSeg(\"{}\")", self.as_str())
    }
}

impl fmt::Display for NameSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a path string is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// The path does not start at the namespace root (`\`).
    NotAbsolute,
    /// Two dots in a row, or a trailing dot.
    EmptySegment,
    /// A segment is longer than four characters.
    SegmentTooLong,
    /// A segment contains a character outside `[A-Z0-9_]`, or starts with a digit.
    InvalidCharacter,
    /// More than [`MAX_PATH_DEPTH`] segments.
    TooDeep,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAbsolute => f.write_str("path must start with '\\'"),
            Self::EmptySegment => f.write_str("empty name segment"),
            Self::SegmentTooLong => f.write_str("name segment longer than 4 characters"),
            Self::InvalidCharacter => f.write_str("invalid character in name segment"),
            Self::TooDeep => f.write_str("path too deep"),
        }
    }
}

/// Maximum number of segments in an inline path.
pub const MAX_PATH_DEPTH: usize = 16;

/// A fixed-capacity absolute ACPI namespace path.
#[derive(Clone, Copy)]
pub struct AcpiPath {
    segments: [NameSeg; MAX_PATH_DEPTH],
    len: u8,
}

impl AcpiPath {
    /// The root path (`\`).
    pub const ROOT: Self = Self {
        segments: [NameSeg(*b"____"); MAX_PATH_DEPTH],
        len: 0,
    };

    /// Parses an absolute path such as `\_SB.LID0`.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        let rest = path.strip_prefix('\\').ok_or(PathError::NotAbsolute)?;
        let mut out = Self::ROOT;
        if rest.is_empty() {
            return Ok(out);
        }
        for name in rest.split('.') {
            if !out.push(NameSeg::parse(name)?) {
                return Err(PathError::TooDeep);
            }
        }
        Ok(out)
    }

    /// Appends a name segment to the path.
    ///
    /// Returns `false` if the path is already at maximum capacity.
    pub fn push(&mut self, seg: NameSeg) -> bool {
        if (self.len as usize) >= MAX_PATH_DEPTH {
            return false;
        }
        self.segments[self.len as usize] = seg;
        self.len += 1;
        true
    }

    /// Returns the segments of this path.
    #[must_use]
    pub fn segments(&self) -> &[NameSeg] {
        &self.segments[..self.len as usize]
    }

    /// Returns the number of segments (depth) in this path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.len as usize
    }
}

impl PartialEq for AcpiPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments() == other.segments()
    }
}

impl Eq for AcpiPath {}

impl fmt::Debug for AcpiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AcpiPath({self})")
    }
}

impl fmt::Display for AcpiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\\")?;
        for (i, seg) in self.segments().iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}
