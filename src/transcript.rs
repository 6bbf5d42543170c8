use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::Path;

/// One line of the training transcript: `[<index>]: <message>`.
#[derive(Debug, Clone, Copy)]
pub struct TranscriptLine<'a> {
    pub index: usize,
    pub message: &'a str,
}

impl fmt::Display for TranscriptLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.index, self.message)
    }
}

/// One line of the name index file: `<index> : <name>`.
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry<'a> {
    pub index: usize,
    pub name: &'a str,
}

impl fmt::Display for IndexEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.index, self.name)
    }
}

/// Opens `path` for appending, creating it and its parent directories if
/// needed. Existing content is kept.
pub fn open_append(path: &Path) -> io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    log::debug!("Opened {} for appending", path.display());

    Ok(BufWriter::new(file))
}
