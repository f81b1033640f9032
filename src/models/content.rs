//! File payloads returned by a read, with their inferred media type.

use bytes::Bytes;

/// Fallback for extensions missing from [`MEDIA_TYPES`].
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Extension (lower-case, without the dot) to media type.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("json", "application/json"),
    ("module", "application/json"),
    ("xml", "application/xml"),
    ("pom", "application/xml"),
    ("jar", "application/java-archive"),
    ("war", "application/java-archive"),
    ("ear", "application/java-archive"),
    ("zip", "application/zip"),
    ("txt", "text/plain"),
    ("md5", "text/plain"),
    ("sha1", "text/plain"),
    ("sha256", "text/plain"),
    ("sha512", "text/plain"),
    ("asc", "text/plain"),
    ("yml", "application/yaml"),
    ("yaml", "application/yaml"),
];

/// Infer a media type from a file name's final extension.
pub fn media_type_for(name: &str) -> &'static str {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    if stem.is_empty() {
        return OCTET_STREAM;
    }
    let ext = ext.to_ascii_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, media_type)| *media_type)
        .unwrap_or(OCTET_STREAM)
}

/// Raw bytes of one remote file.
#[derive(Clone, Debug)]
pub struct FileContent {
    pub name: String,
    pub bytes: Bytes,
    pub media_type: &'static str,

    /// Remote content hash of the version that was read.
    pub handle: Option<String>,
}

impl FileContent {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>, handle: Option<String>) -> Self {
        let name = name.into();
        Self {
            media_type: media_type_for(&name),
            name,
            bytes: bytes.into(),
            handle,
        }
    }
}
