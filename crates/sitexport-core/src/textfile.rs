//! Whole-file UTF-8 read and in-place replacement for the rewrite passes.
//!
//! Writes go to a sibling temp file which is then renamed over the original,
//! so a failed write never leaves a truncated page behind.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ExportError;

/// UTF-8 byte-order mark as decoded text.
pub const BOM: char = '\u{feff}';

/// Temporary file suffix used before the atomic rename.
const TEMP_SUFFIX: &str = ".sitexport.part";

/// Reads the whole file as UTF-8. Invalid UTF-8 is an `InvalidData` I/O failure.
pub fn read_utf8(path: &Path) -> Result<String, ExportError> {
    let bytes = fs::read(path).map_err(|e| ExportError::file_io(path, e))?;
    String::from_utf8(bytes).map_err(|e| {
        ExportError::file_io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("not valid UTF-8: {}", e.utf8_error()),
            ),
        )
    })
}

/// Replaces the file's contents with `text` (UTF-8, no BOM added), keeping its permissions.
pub fn write_utf8(path: &Path, text: &str) -> Result<(), ExportError> {
    let temp = temp_path_for(path);
    let result = write_and_rename(path, &temp, text.as_bytes());
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result.map_err(|e| ExportError::file_io(path, e))
}

fn write_and_rename(path: &Path, temp: &Path, bytes: &[u8]) -> io::Result<()> {
    let permissions = fs::metadata(path)?.permissions();
    fs::write(temp, bytes)?;
    fs::set_permissions(temp, permissions)?;
    fs::rename(temp, path)
}

/// Path for the temp file: appends `.sitexport.part` to the file name.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_appends_suffix() {
        assert_eq!(
            temp_path_for(Path::new("/out/site/index.html")),
            PathBuf::from("/out/site/index.html.sitexport.part")
        );
    }

    #[test]
    fn write_replaces_contents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "old content that is longer").unwrap();
        write_utf8(&path, "new \u{2014}").unwrap();
        assert_eq!(read_utf8(&path).unwrap(), "new \u{2014}");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn write_to_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.html");
        let err = write_utf8(&path, "x").unwrap_err();
        assert!(matches!(err, ExportError::FileIo { .. }));
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn read_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.js");
        fs::write(&path, [0xFF, 0xFE, b'x']).unwrap();
        match read_utf8(&path) {
            Err(ExportError::FileIo { source, .. }) => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("expected FileIo, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.js");
        fs::write(&path, "a").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        write_utf8(&path, "b").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
