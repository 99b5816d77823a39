use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use tracing::debug;

use crate::domain::Location;
use crate::error::SourceError;
use crate::ports::ContentSource;

/// Reads files from the local filesystem, resolving locations relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FsContentSource {
    root: PathBuf,
}

impl FsContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for FsContentSource {
    type Stream = BufReader<File>;

    fn fetch(&self, location: &Location) -> Result<Self::Stream, SourceError> {
        let path = self.root.join(location.as_str());
        debug!(path = %path.display(), "opening file");
        File::open(&path)
            .map(BufReader::new)
            .map_err(|err| SourceError::from_io(location, err))
    }
}
