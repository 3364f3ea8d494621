//! MIME type probing and the binary-verdict cache.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// MIME name for content that could not be identified as text.
pub const OCTET_STREAM: &str = "application/octet-stream";
/// MIME name for empty files.
pub const ZERO_SIZE: &str = "application/x-zerosize";
/// MIME name for unrecognized text.
pub const TEXT_PLAIN: &str = "text/plain";

/// How many leading bytes are sniffed when the extension is unknown.
const SNIFF_LEN: usize = 512;

/// Extensions that are binary without needing a MIME lookup.
const WELL_KNOWN_BINARY_EXTENSIONS: &[&str] = &[
    // Object code and archives
    "o", "obj", "a", "lib", "so", "dylib", "dll", "exe", "pdb", "ilk", "pch", "gch", "pcm",
    "class", "jar", "pyc", "pyo", "wasm",
    // Images
    "png", "jpg", "jpeg", "gif", "ico", "webp", "bmp", "tiff",
    // Fonts
    "woff", "woff2", "ttf", "eot", "otf",
    // Media
    "mp3", "mp4", "wav", "ogg", "webm", "avi", "mov", "flac",
    // Archives
    "zip", "tar", "gz", "rar", "7z", "bz2", "xz", "tgz", "zst",
    // Documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // Databases
    "db", "sqlite", "sqlite3",
];

/// `application/*` types that are nevertheless text.
const TEXT_APPLICATION_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/toml",
    "application/x-yaml",
    "application/x-shellscript",
    "application/x-perl",
    "application/x-ruby",
    ZERO_SIZE,
];

/// Memoized "is this MIME type binary" verdicts, keyed by MIME name.
///
/// Owned by one scan at a time: the coordinator moves it into a scan and gets
/// it back in the [`ScanResult`](crate::ScanResult).
#[derive(Clone, Debug, Default)]
pub struct MimeBinaryCache {
    verdicts: HashMap<String, bool>,
}

impl MimeBinaryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached verdict for a MIME name, computing and storing it on
    /// a miss.
    pub fn is_binary(&mut self, mime: &str) -> bool {
        if let Some(&verdict) = self.verdicts.get(mime) {
            return verdict;
        }
        let verdict = is_mime_binary(mime);
        self.verdicts.insert(mime.to_string(), verdict);
        verdict
    }

    /// Returns the cached verdict without computing one.
    pub fn get(&self, mime: &str) -> Option<bool> {
        self.verdicts.get(mime).copied()
    }

    /// Number of MIME names with a verdict.
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    /// Returns `true` if no verdicts are cached.
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

/// Returns `true` if the extension marks the file as binary outright.
pub fn is_well_known_binary(path: &Path, extra_extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    WELL_KNOWN_BINARY_EXTENSIONS.contains(&ext.as_str())
        || extra_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
}

/// A MIME type is binary unless it is `text/*` or a known text-like
/// `application/*` type.
pub fn is_mime_binary(mime: &str) -> bool {
    !(mime.starts_with("text/") || TEXT_APPLICATION_TYPES.contains(&mime))
}

/// Determines a file's MIME name, by extension when it is known and by
/// sniffing the leading bytes otherwise.
pub fn mime_name(path: &Path) -> String {
    if let Some(mime) = mime_by_name(path) {
        return mime.to_string();
    }
    sniff(path).to_string()
}

fn mime_by_name(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?;
    if name == "CMakeLists.txt" {
        return Some("text/x-cmake");
    }
    if name == "Makefile" || name == "GNUmakefile" {
        return Some("text/x-makefile");
    }
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "c" => "text/x-csrc",
        "h" => "text/x-chdr",
        "cpp" | "cxx" | "cc" | "c++" | "cp" => "text/x-c++src",
        "hpp" | "hxx" | "hh" | "h++" | "inl" | "tcc" => "text/x-c++hdr",
        "m" => "text/x-objcsrc",
        "mm" => "text/x-objc++src",
        "txt" | "log" => TEXT_PLAIN,
        "md" => "text/markdown",
        "cmake" => "text/x-cmake",
        "py" => "text/x-python",
        "rs" => "text/rust",
        "json" => "application/json",
        "xml" => "application/xml",
        "js" => "application/javascript",
        "toml" => "application/toml",
        "yml" | "yaml" => "application/x-yaml",
        "sh" => "application/x-shellscript",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gz" => "application/gzip",
        "zip" => "application/zip",
        _ => return None,
    };
    Some(mime)
}

fn sniff(path: &Path) -> &'static str {
    let mut buffer = [0u8; SNIFF_LEN];
    let read = std::fs::File::open(path).and_then(|mut f| f.read(&mut buffer));
    match read {
        Ok(0) => ZERO_SIZE,
        Ok(n) if buffer[..n].contains(&0) => OCTET_STREAM,
        Ok(_) => TEXT_PLAIN,
        Err(err) => {
            tracing::trace!(path = %path.display(), %err, "cannot sniff file");
            OCTET_STREAM
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_types_are_not_binary() {
        assert!(!is_mime_binary("text/plain"));
        assert!(!is_mime_binary("text/x-c++src"));
        assert!(!is_mime_binary("application/json"));
        assert!(!is_mime_binary(ZERO_SIZE));
        assert!(is_mime_binary(OCTET_STREAM));
        assert!(is_mime_binary("image/png"));
    }

    #[test]
    fn well_known_binaries() {
        assert!(is_well_known_binary(Path::new("/p/a.o"), &[]));
        assert!(is_well_known_binary(Path::new("/p/LOGO.PNG"), &[]));
        assert!(!is_well_known_binary(Path::new("/p/a.cpp"), &[]));
        assert!(!is_well_known_binary(Path::new("/p/Makefile"), &[]));
        assert!(is_well_known_binary(
            Path::new("/p/fw.bin"),
            &["bin".to_string()]
        ));
    }

    #[test]
    fn cache_memoizes_by_name() {
        let mut cache = MimeBinaryCache::new();
        assert!(cache.get("image/png").is_none());
        assert!(cache.is_binary("image/png"));
        assert!(!cache.is_binary("text/plain"));
        assert!(cache.is_binary("image/png"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("image/png"), Some(true));
    }

    #[test]
    fn mime_by_extension_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes");
        let blob = dir.path().join("firmware");
        let empty = dir.path().join("empty");
        std::fs::write(&text, "hello\n").unwrap();
        std::fs::write(&blob, [0x7f, b'E', b'L', b'F', 0, 1, 2]).unwrap();
        std::fs::write(&empty, "").unwrap();

        assert_eq!(mime_name(Path::new("/nonexistent/a.hpp")), "text/x-c++hdr");
        assert_eq!(mime_name(&text), TEXT_PLAIN);
        assert_eq!(mime_name(&blob), OCTET_STREAM);
        assert_eq!(mime_name(&empty), ZERO_SIZE);
    }
}
