//! JSON rendering of results, for `--json` output and scripting.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::ResultsReport;
use crate::{ExerciseError, Result};

/// Serializes a [`ResultsReport`].
pub struct JsonGenerator<'a> {
    report: &'a ResultsReport,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a generator for `report`.
    #[must_use]
    pub const fn new(report: &'a ResultsReport) -> Self {
        Self { report }
    }

    /// Single-line JSON.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.report).map_err(ExerciseError::from)
    }

    /// Indented JSON.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.report).map_err(ExerciseError::from)
    }

    /// Writes the report to `path`, creating or truncating it.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
