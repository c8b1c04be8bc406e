//! Error catalog loading and code sequencing.
//!
//! The catalog is a JSON object mapping decimal error codes to their human
//! readable descriptions, e.g. `{"40000": "Bad Request"}`. The upstream file
//! carries `/* ... */` block comments, which are stripped before parsing.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::bytes::Regex;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use tracing::debug;

use crate::error::{Error, Result};

/// Non-greedy `/* ... */` block, spanning newlines.
static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment pattern"));

/// Error codes and their descriptions, as read from the catalog.
///
/// Iteration order of the underlying map is unspecified; use
/// [`Catalog::codes`] for a deterministic sequence.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: HashMap<i64, String>,
}

impl Catalog {
    /// Description for `code`, or an empty string when the catalog has no
    /// such code.
    pub fn get(&self, code: i64) -> &str {
        self.entries.get(&code).map(String::as_str).unwrap_or_default()
    }

    /// All codes in ascending order, each exactly once.
    pub fn codes(&self) -> Vec<i64> {
        let mut codes: Vec<i64> = self.entries.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keys are decimal strings parsed the way `str::parse::<i64>` does, so
/// `"01"` and `"+5"` are accepted. Entries are applied in document order:
/// when two keys name the same code the later one wins.
impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping integer error codes to descriptions")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Catalog, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = HashMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, description)) = map.next_entry::<String, String>()? {
            let code = key.parse::<i64>().map_err(|e| {
                <A::Error as de::Error>::custom(format!("error code {key:?} is not an integer: {e}"))
            })?;
            entries.insert(code, description);
        }
        Ok(Catalog { entries })
    }
}

/// Remove every `/* ... */` block from `raw`.
///
/// This is a purely lexical pass: it knows nothing about JSON strings, so a
/// `/*` inside a quoted description is treated as the start of a comment.
pub fn strip_block_comments(raw: &[u8]) -> Cow<'_, [u8]> {
    BLOCK_COMMENT.replace_all(raw, &b""[..])
}

/// Parse catalog bytes into a [`Catalog`].
///
/// Fails with [`Error::Parse`] when the stripped document is not a JSON
/// object, when a key is not an integer, or when a value is not a string.
pub fn parse_catalog(raw: &[u8]) -> Result<Catalog> {
    let stripped = strip_block_comments(raw);
    debug!(
        removed = raw.len() - stripped.len(),
        "stripped block comments from catalog"
    );
    let catalog: Catalog = serde_json::from_slice(&stripped)?;
    Ok(catalog)
}

/// Load and parse a catalog file from disk.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = std::fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_catalog(&raw)
}

/// Load a catalog from a file path, or from an `http(s)://` URL when the
/// `download` feature is enabled.
pub fn open_catalog(source: &str) -> Result<Catalog> {
    #[cfg(feature = "download")]
    if is_remote(source) {
        let rt = tokio::runtime::Runtime::new().map_err(|e| Error::Download(e.to_string()))?;
        return rt.block_on(download_catalog(&reqwest::Client::new(), source));
    }
    load_catalog(Path::new(source))
}

#[cfg(feature = "download")]
fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Fetch a catalog over HTTP(S) and parse it.
#[cfg(feature = "download")]
pub async fn download_catalog(client: &reqwest::Client, url: &str) -> Result<Catalog> {
    tracing::info!(%url, "downloading error catalog");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Download(format!("GET {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Download(format!(
            "GET {url} returned {}",
            response.status()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Download(format!("reading response body: {e}")))?;

    parse_catalog(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMENTED: &str = r#"/* Error codes
 * shared across client libraries */
{
    /* generic */
    "40000": "bad request",
    "10000": "no error",
    /* auth */ "40100": "unauthorized"
}"#;

    #[test]
    fn strips_multiline_and_inline_comments() {
        let stripped = strip_block_comments(COMMENTED.as_bytes());
        let text = std::str::from_utf8(&stripped).unwrap();
        assert!(!text.contains("/*"));
        assert!(!text.contains("*/"));
        assert!(text.contains(r#""40100": "unauthorized""#));
    }

    #[test]
    fn stripping_is_non_greedy() {
        let stripped = strip_block_comments(b"a/* one */b/* two */c");
        assert_eq!(&*stripped, b"abc");
    }

    #[test]
    fn stripping_twice_changes_nothing() {
        let once = strip_block_comments(COMMENTED.as_bytes()).into_owned();
        let twice = strip_block_comments(&once);
        assert_eq!(once, &*twice);
    }

    #[test]
    fn stripping_is_not_string_aware() {
        let raw = br#"{"1": "a /* b */ c"}"#;
        let catalog = parse_catalog(raw).unwrap();
        assert_eq!(catalog.get(1), "a  c");
    }

    #[test]
    fn parse_commented_catalog() {
        let catalog = parse_catalog(COMMENTED.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(40000), "bad request");
        assert_eq!(catalog.get(40100), "unauthorized");
    }

    #[test]
    fn codes_are_ascending_and_complete() {
        let catalog = parse_catalog(COMMENTED.as_bytes()).unwrap();
        assert_eq!(catalog.codes(), vec![10000, 40000, 40100]);
    }

    #[test]
    fn codes_sort_numerically_not_lexically() {
        let catalog = parse_catalog(br#"{"9": "a", "100": "b", "20": "c"}"#).unwrap();
        assert_eq!(catalog.codes(), vec![9, 20, 100]);
    }

    #[test]
    fn empty_catalog_has_no_codes() {
        let catalog = parse_catalog(b"/* nothing */ {}").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.codes().is_empty());
    }

    #[test]
    fn missing_code_is_empty_string() {
        let catalog = parse_catalog(br#"{"1": "one"}"#).unwrap();
        assert_eq!(catalog.get(999_999), "");
    }

    #[test]
    fn non_integer_key_is_parse_error() {
        let err = parse_catalog(br#"{"abc": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn keys_accept_leading_zeros_and_sign() {
        let catalog = parse_catalog(br#"{"01": "one", "+5": "five", "-7": "minus"}"#).unwrap();
        assert_eq!(catalog.codes(), vec![-7, 1, 5]);
        assert_eq!(catalog.get(1), "one");
        assert_eq!(catalog.get(5), "five");
    }

    #[test]
    fn equivalent_keys_collapse_to_last_entry() {
        let catalog = parse_catalog(br#"{"01": "x", "1": "y"}"#).unwrap();
        assert_eq!(catalog.codes(), vec![1]);
        assert_eq!(catalog.get(1), "y");

        let catalog = parse_catalog(br#"{"1": "y", "001": "x"}"#).unwrap();
        assert_eq!(catalog.get(1), "x");
    }

    #[test]
    fn key_with_whitespace_is_parse_error() {
        let err = parse_catalog(br#"{" 1": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("is not an integer"));
    }

    #[test]
    fn non_object_is_parse_error() {
        let err = parse_catalog(br#"["1", "x"]"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[cfg(feature = "download")]
    #[test]
    fn remote_sources_are_recognised() {
        assert!(is_remote("https://example.com/errors.json"));
        assert!(is_remote("http://localhost:8080/errors.json"));
        assert!(!is_remote("protocol/errors.json"));
        assert!(!is_remote("httpdocs/errors.json"));
    }

    #[test]
    fn non_string_value_is_parse_error() {
        let err = parse_catalog(br#"{"1": 2}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = parse_catalog(br#"{"1": "x""#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn unterminated_comment_is_left_in_place() {
        let err = parse_catalog(br#"/* open {"1": "x"}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
