use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use super::request::LoadError;

/// Upper bound for documents fetched over HTTP
const MAX_REMOTE_BYTES: u64 = 256 * 1024 * 1024;

/// Where a document's bytes come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentSource {
    File(PathBuf),
    Url(String),
}

impl DocumentSource {
    /// Interpret a command-line locator: `http(s)://` is a URL, anything else a path
    #[must_use]
    pub fn parse(locator: &str) -> Self {
        let lower = locator.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(locator.to_string())
        } else {
            Self::File(PathBuf::from(locator))
        }
    }

    /// Format hint for the PDF engine, taken from the file extension
    #[must_use]
    pub fn magic(&self) -> String {
        let name = match self {
            Self::File(path) => path.as_path(),
            Self::Url(url) => Path::new(url.split(['?', '#']).next().unwrap_or(url)),
        };
        name.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| !ext.is_empty() && ext.len() <= 5)
            .unwrap_or_else(|| "pdf".to_string())
    }

    /// Read the full document into memory
    pub fn read_bytes(&self) -> Result<Vec<u8>, LoadError> {
        match self {
            Self::File(path) => std::fs::read(path).map_err(|source| LoadError::Io {
                path: path.display().to_string(),
                source,
            }),
            Self::Url(url) => fetch(url),
        }
    }
}

fn fetch(url: &str) -> Result<Vec<u8>, LoadError> {
    let fetch_err = |detail: String| LoadError::Fetch {
        url: url.to_string(),
        detail,
    };

    let resp = ureq::agent()
        .get(url)
        .set("User-Agent", "docview")
        .call()
        .map_err(|e| fetch_err(e.to_string()))?;

    let mut bytes = Vec::new();
    resp.into_reader()
        .take(MAX_REMOTE_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| fetch_err(e.to_string()))?;

    debug!("Fetched {} bytes from {url}", bytes.len());
    Ok(bytes)
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_recognises_urls_case_insensitively() {
        assert_eq!(
            DocumentSource::parse("HTTPS://example.com/a.pdf"),
            DocumentSource::Url("HTTPS://example.com/a.pdf".into())
        );
        assert_eq!(
            DocumentSource::parse("docs/a.pdf"),
            DocumentSource::File(PathBuf::from("docs/a.pdf"))
        );
    }

    #[test]
    fn magic_ignores_query_and_defaults_to_pdf() {
        let url = DocumentSource::parse("https://cdn.test/file.XPS?sig=abc");
        assert_eq!(url.magic(), "xps");
        assert_eq!(DocumentSource::parse("https://cdn.test/blob").magic(), "pdf");
    }

    #[test]
    fn read_bytes_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let source = DocumentSource::File(file.path().to_path_buf());
        assert_eq!(source.read_bytes().unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = DocumentSource::parse("/definitely/not/here.pdf");
        assert!(matches!(source.read_bytes(), Err(LoadError::Io { .. })));
    }
}
