//! Providers of schema text.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// Something that can hand over the full text of a schema.
pub trait SchemaSource {
    fn load(&self) -> Result<Cow<'_, str>, SourceError>;
}

impl SchemaSource for str {
    fn load(&self) -> Result<Cow<'_, str>, SourceError> {
        Ok(Cow::Borrowed(self))
    }
}

impl SchemaSource for String {
    fn load(&self) -> Result<Cow<'_, str>, SourceError> {
        Ok(Cow::Borrowed(self.as_str()))
    }
}

/// A schema stored in a UTF-8 file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaSource for FileSource {
    fn load(&self) -> Result<Cow<'_, str>, SourceError> {
        fs::read_to_string(&self.path)
            .map(Cow::Owned)
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_source_borrows() {
        let text = "service S {}";
        assert!(matches!(text.load().unwrap(), Cow::Borrowed("service S {}")));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let source = FileSource::new("/nonexistent/protoroute/hello.proto");
        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/protoroute/hello.proto"));
    }
}
