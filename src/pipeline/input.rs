//! Input resolution: validate a user-supplied path before pdfium sees it.
//!
//! pdfium's own failure for a bad path is a cryptic load error, so existence,
//! readability, and the `%PDF` magic bytes are checked up front to give the
//! caller a meaningful error instead of a backend crash.

use crate::error::Pdf2RaceError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_local(path: &Path) -> Result<PathBuf, Pdf2RaceError> {
    if !path.exists() {
        return Err(Pdf2RaceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Check read permission by attempting to open.
    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2RaceError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2RaceError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Pdf2RaceError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = resolve_local(Path::new("/no/such/file.pdf")).unwrap_err();
        assert!(matches!(err, Pdf2RaceError::FileNotFound { .. }));
    }

    #[test]
    fn non_pdf_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"hello world")
            .unwrap();

        let err = resolve_local(&path).unwrap_err();
        match err {
            Pdf2RaceError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"%PDF-1.7\n")
            .unwrap();

        assert_eq!(resolve_local(&path).unwrap(), path);
    }
}
