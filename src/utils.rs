use rand::distributions::Alphanumeric;
use rand::Rng;
use url::Url;

/// Length of generated filename ids
const ID_LENGTH: usize = 8;

/// Generate a random 8-character lowercase alphanumeric id
pub fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Build a generated output filename: `<prefix>_<random id>.<ext>`
pub fn generated_filename(prefix: &str, extension: &str) -> String {
    format!("{}_{}.{}", prefix, random_id(), extension.trim_start_matches('.'))
}

/// Append the extension to a caller-supplied name unless already present
pub fn with_extension(name: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    let suffix = format!(".{}", extension);
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

/// Directory name for a page's downloads, derived from its path with
/// slashes replaced by underscores
pub fn page_dir_name(page_url: &Url) -> String {
    let name = page_url.path().trim_matches('/').replace('/', "_");
    if name.is_empty() {
        "page".to_string()
    } else {
        name
    }
}

/// Final path segment of a file URL, used as its save filename
pub fn file_name_from_url(file_url: &str) -> Option<String> {
    let parsed = Url::parse(file_url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_string())
}
