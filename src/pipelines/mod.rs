pub mod image;
pub mod raw;

use std::error::Error;
use std::path::Path;

/// Read page references from the list file, one per line.
///
/// A missing list file is a no-op run; a file that exists but cannot be
/// read is a configuration error that ends the run. Blank lines are
/// skipped.
pub fn read_page_list(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    if !path.is_file() {
        ::log::info!("page list {} not found, nothing to do", path.display());
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_page_list_missing_is_noop() {
        let pages = read_page_list(Path::new("/no/such/urls.txt")).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_read_page_list_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "/w/Villager").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  https://example.wiki/w/Pillager  ").unwrap();

        let pages = read_page_list(file.path()).unwrap();
        assert_eq!(
            pages,
            vec![
                "/w/Villager".to_string(),
                "https://example.wiki/w/Pillager".to_string(),
            ]
        );
    }

    #[test]
    fn test_read_page_list_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(read_page_list(file.path()).unwrap().is_empty());
    }
}
