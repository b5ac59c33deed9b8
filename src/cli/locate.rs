//! Function region lookup for a file and byte offset.

use std::io::{self, Write};

use serde::Serialize;
use suture::source::{SourceRegion, extract_name, locate};
use suture::{PatchError, SutureConfig};

use super::output::{read_input, write_json};

/// Region reported for `--file`/`--offset`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocateOutput {
    /// Whether a balanced function body was found.
    pub found: bool,
    /// Region start, or `-1`.
    pub start: i64,
    /// Region end (exclusive), or `-1`.
    pub end: i64,
    /// Name on the declaration line, when one could be extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LocateOutput {
    fn from_region(text: &str, region: SourceRegion) -> Self {
        let (start, end) = region.as_offsets();
        let name = region
            .slice(text)
            .ok()
            .and_then(|body| body.lines().next())
            .and_then(extract_name);
        Self {
            found: true,
            start,
            end,
            name,
        }
    }

    const fn not_found() -> Self {
        let (start, end) = SourceRegion::NOT_FOUND_OFFSETS;
        Self {
            found: false,
            start,
            end,
            name: None,
        }
    }
}

/// Locates the region around `--offset` in `--file` and prints it.
///
/// # Errors
///
/// Returns [`PatchError::Configuration`] if the file or offset is missing
/// and [`PatchError::Io`] if the file cannot be read.
pub fn run(config: &SutureConfig) -> Result<(), PatchError> {
    let mut stdout = io::stdout().lock();
    run_with_writer(config, &mut stdout)
}

/// Locates a region and writes the JSON result to `writer`.
pub fn run_with_writer<W: Write>(config: &SutureConfig, writer: &mut W) -> Result<(), PatchError> {
    let path = config.require_file()?;
    let requested = config.offset.ok_or_else(|| PatchError::Configuration {
        message: "an offset is required (use --offset)".to_owned(),
    })?;
    let text = read_input(path)?;
    let approx_index = usize::try_from(requested).unwrap_or(usize::MAX);

    let output = match locate(&text, approx_index) {
        Ok(region) => LocateOutput::from_region(&text, region),
        Err(PatchError::BoundaryNotFound { .. }) => LocateOutput::not_found(),
        Err(error) => return Err(error),
    };
    write_json(writer, &output)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use suture::SutureConfig;
    use tempfile::NamedTempFile;

    use super::run_with_writer;

    fn source_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file should be created");
        file.write_all(contents.as_bytes())
            .expect("temp file should be writable");
        file
    }

    fn run_locate(contents: &str, offset: u64) -> serde_json::Value {
        let file = source_file(contents);
        let config = SutureConfig {
            file: Some(file.path().display().to_string()),
            offset: Some(offset),
            ..Default::default()
        };
        let mut buffer = Vec::new();
        run_with_writer(&config, &mut buffer).expect("locate should succeed");
        serde_json::from_slice(&buffer).expect("output should be JSON")
    }

    #[test]
    fn prints_region_and_name() {
        let output = run_locate("const a = 1;\nfunction add(x, y) {\n  return x + y;\n}\n", 20);

        assert_eq!(output["found"], true);
        assert_eq!(output["start"], 13);
        assert_eq!(output["end"], 51);
        assert_eq!(output["name"], "add");
    }

    #[test]
    fn prints_sentinel_when_nothing_encloses_offset() {
        let output = run_locate("const a = 1;\nconst b = 2;\n", 3);

        assert_eq!(output["found"], false);
        assert_eq!(output["start"], -1);
        assert_eq!(output["end"], -1);
        assert!(output.get("name").is_none());
    }

    #[test]
    fn missing_offset_is_a_configuration_error() {
        let config = SutureConfig {
            file: Some("whatever.ts".to_owned()),
            ..Default::default()
        };
        let mut buffer = Vec::new();

        let error = run_with_writer(&config, &mut buffer).expect_err("should fail");
        assert!(error.to_string().contains("--offset"), "got: {error}");
    }
}
