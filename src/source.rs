use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, NamedSource, Result, WrapErr};

/// Assembly source together with the name it is reported under.
#[derive(Clone, Debug)]
pub struct SourceFile {
    name: String,
    text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        SourceFile {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a source file from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read source file {}", path.display()))?;
        Ok(SourceFile::new(path.display().to_string(), text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Source code handle that diagnostics render their labels against.
    pub fn named(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.text.clone())
    }
}
