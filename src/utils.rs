use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};

pub const FORECAST_EXTENSION: &str = "json";

/// `<cache_dir>/<YYYY-MM-DD>.json`
pub fn cache_file_path(cache_dir: &Path, date: NaiveDate) -> PathBuf {
    cache_dir.join(format!("{}.{}", date.format("%Y-%m-%d"), FORECAST_EXTENSION))
}

/// Creates `path` (and parents) unless it already is a directory.
pub fn ensure_dir_exists(path: &Path) -> io::Result<()> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", path.display()),
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => std::fs::create_dir_all(path),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_path_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 6).unwrap();
        assert_eq!(
            cache_file_path(Path::new("forecasts"), date),
            PathBuf::from("forecasts/2023-06-06.json")
        );
    }

    #[test]
    fn test_ensure_dir_exists_creates_nested_and_rejects_files() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent.
        ensure_dir_exists(&nested).unwrap();

        let file = tmp.path().join("plain");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_dir_exists(&file).is_err());
    }
}
