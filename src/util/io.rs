use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Path argument meaning standard input or standard output.
pub const STDIO_PATH: &str = "-";

pub trait StdioPathExtension {
    /// Whether the path stands for standard input/output.
    ///
    /// returns: bool
    fn is_stdio(&self) -> bool;
}

impl StdioPathExtension for Path {
    fn is_stdio(&self) -> bool {
        self.as_os_str() == STDIO_PATH
    }
}

/// Read the whole input from a file, or from standard input if the path is `-`.
///
/// # Arguments
///
/// * `path`: The file to read
///
/// returns: Result<Vec<u8>>
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.is_stdio() {
        let mut buf = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("Could not read from standard input")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("Could not read file {}", path.display()))
}

/// Write the output to a file, or to standard output if no path is given or the path is `-`.
///
/// The bytes are written as given in both cases.
///
/// # Arguments
///
/// * `path`: The file to write
/// * `contents`: The contents to write
///
/// returns: Result<()>
pub fn write_output(path: Option<&Path>, contents: &[u8]) -> Result<()> {
    match path {
        Some(path) if !path.is_stdio() => std::fs::write(path, contents)
            .with_context(|| format!("Could not write file {}", path.display())),
        _ => write_stream(std::io::stdout().lock(), contents)
            .context("Could not write to standard output"),
    }
}

fn write_stream<W: Write>(mut out: W, contents: &[u8]) -> std::io::Result<()> {
    out.write_all(contents)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stdio() {
        assert!(Path::new("-").is_stdio());
        assert!(!Path::new("./-").is_stdio());
        assert!(!Path::new("domain.xml").is_stdio());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        write_output(Some(&path), b"<domain/>").unwrap();
        assert_eq!(read_input(&path).unwrap(), b"<domain/>");
    }

    #[test]
    fn test_stream_and_file_get_the_same_bytes() {
        let contents = b"<domain><name>vm</name></domain>";
        let mut stream = Vec::new();
        write_stream(&mut stream, contents).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");
        write_output(Some(&path), contents).unwrap();

        assert_eq!(stream, contents);
        assert_eq!(std::fs::read(&path).unwrap(), stream);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_input(Path::new("/nonexistent/domain.xml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/domain.xml"));
    }
}
