use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Resolves a 1-based frame number to encoded image bytes.
///
/// Implementations are called concurrently from the preload pool, one call per frame.
pub trait FrameSource: Send + Sync {
    /// Load the encoded bytes of frame `number` (1-based).
    fn load(&self, number: usize) -> ReelResult<Vec<u8>>;
}

/// Reads frames from a directory using a printf-style pattern such as
/// `video-frames/frame_%04d.jpg`.
#[derive(Clone, Debug)]
pub struct DirFrameSource {
    root: PathBuf,
    pattern: FramePattern,
}

impl DirFrameSource {
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> ReelResult<Self> {
        Ok(Self {
            root: root.into(),
            pattern: FramePattern::parse(pattern)?,
        })
    }

    /// Root directory that relative frame paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (root-joined) path of frame `number`.
    pub fn path_for(&self, number: usize) -> ReelResult<PathBuf> {
        let rel = normalize_rel_path(&self.pattern.format(number))?;
        Ok(self.root.join(Path::new(&rel)))
    }
}

impl FrameSource for DirFrameSource {
    fn load(&self, number: usize) -> ReelResult<Vec<u8>> {
        let path = self.path_for(number)?;
        std::fs::read(&path)
            .map_err(|e| ReelError::frame(number, format!("read '{}': {e}", path.display())))
    }
}

/// Widest zero padding a `%0Nd` placeholder may ask for.
pub const MAX_PAD_WIDTH: usize = 32;

/// Parsed frame path pattern with a single `%d` / `%0Nd` placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePattern {
    prefix: String,
    suffix: String,
    width: usize,
}

impl FramePattern {
    pub fn parse(pattern: &str) -> ReelResult<Self> {
        let Some(start) = pattern.find('%') else {
            return Err(ReelError::config(format!(
                "frame pattern '{pattern}' has no %d placeholder"
            )));
        };
        let rest = &pattern[start + 1..];
        let digits_len = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        let (digits, tail) = rest.split_at(digits_len);
        let Some(suffix) = tail.strip_prefix('d') else {
            return Err(ReelError::config(format!(
                "frame pattern '{pattern}' placeholder must be %d or %0Nd"
            )));
        };
        if suffix.contains('%') {
            return Err(ReelError::config(format!(
                "frame pattern '{pattern}' must contain exactly one placeholder"
            )));
        }
        let width = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<usize>()
                .ok()
                .filter(|w| *w <= MAX_PAD_WIDTH)
                .ok_or_else(|| {
                    ReelError::config(format!(
                        "frame pattern '{pattern}' pads wider than {MAX_PAD_WIDTH} digits"
                    ))
                })?
        };

        Ok(Self {
            prefix: pattern[..start].to_string(),
            suffix: suffix.to_string(),
            width,
        })
    }

    /// Substitute `number` into the pattern, zero padded to the declared width.
    pub fn format(&self, number: usize) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            number,
            self.suffix,
            width = self.width
        )
    }
}

/// Clean up a formatted frame path so it stays under the frame root.
///
/// Backslashes become `/`, empty and `.` segments are dropped. Absolute paths and `..` segments
/// are rejected.
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let unified = source.replace('\\', "/");
    if unified.starts_with('/') {
        return Err(ReelError::config(format!(
            "frame path '{source}' is absolute"
        )));
    }
    let segments = unified
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .map(|seg| match seg {
            ".." => Err(ReelError::config(format!(
                "frame path '{source}' leaves the frame directory"
            ))),
            _ => Ok(seg),
        })
        .collect::<ReelResult<Vec<_>>>()?;
    if segments.is_empty() {
        return Err(ReelError::config(format!(
            "frame path '{source}' names no file"
        )));
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
