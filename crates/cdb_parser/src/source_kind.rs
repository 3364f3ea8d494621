//! Source file kinds, classified by extension or by compiler flags.

use std::path::Path;

use cdb_toolchain::Language;
use serde::{Deserialize, Serialize};

/// The kind of a C-family source or header file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Neither the extension nor the flags say what this is.
    #[default]
    Unclassified,
    /// A C header.
    CHeader,
    /// A C source file.
    CSource,
    /// A C++ header.
    CxxHeader,
    /// A C++ source file.
    CxxSource,
    /// An Objective-C header.
    ObjcHeader,
    /// An Objective-C source file.
    ObjcSource,
    /// An Objective-C++ header.
    ObjcxxHeader,
    /// An Objective-C++ source file.
    ObjcxxSource,
    /// A `.h` file, which may be C, C++ or Objective-C.
    AmbiguousHeader,
}

impl SourceKind {
    /// Classifies a path by its extension.
    pub fn classify(path: &Path) -> SourceKind {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return SourceKind::Unclassified;
        };
        // `.C` and `.H` are C++ on case-sensitive filesystems.
        match ext {
            "C" | "ii" => return SourceKind::CxxSource,
            "H" => return SourceKind::CxxHeader,
            _ => {}
        }
        match ext.to_ascii_lowercase().as_str() {
            "c" | "i" => SourceKind::CSource,
            "cpp" | "cxx" | "cc" | "c++" | "cp" | "cppm" | "ixx" => SourceKind::CxxSource,
            "h" => SourceKind::AmbiguousHeader,
            "hpp" | "hxx" | "hh" | "h++" | "hp" | "inl" | "tcc" | "txx" => SourceKind::CxxHeader,
            "m" => SourceKind::ObjcSource,
            "mm" => SourceKind::ObjcxxSource,
            _ => SourceKind::Unclassified,
        }
    }

    /// Maps the argument of `-x` to a kind, taking the header-ness from the
    /// file's own extension.
    pub fn from_language_flag(language: &str, path: &Path) -> SourceKind {
        let header = SourceKind::classify(path).is_header();
        match language {
            "c" => pick(header, SourceKind::CHeader, SourceKind::CSource),
            "c-header" => SourceKind::CHeader,
            "c++" => pick(header, SourceKind::CxxHeader, SourceKind::CxxSource),
            "c++-header" => SourceKind::CxxHeader,
            "objective-c" => pick(header, SourceKind::ObjcHeader, SourceKind::ObjcSource),
            "objective-c-header" => SourceKind::ObjcHeader,
            "objective-c++" => pick(header, SourceKind::ObjcxxHeader, SourceKind::ObjcxxSource),
            "objective-c++-header" => SourceKind::ObjcxxHeader,
            _ => SourceKind::Unclassified,
        }
    }

    /// Returns `true` for every header kind, including [`SourceKind::AmbiguousHeader`].
    pub fn is_header(self) -> bool {
        matches!(
            self,
            SourceKind::CHeader
                | SourceKind::CxxHeader
                | SourceKind::ObjcHeader
                | SourceKind::ObjcxxHeader
                | SourceKind::AmbiguousHeader
        )
    }

    /// Returns `true` for every source (non-header) kind.
    pub fn is_source(self) -> bool {
        matches!(
            self,
            SourceKind::CSource
                | SourceKind::CxxSource
                | SourceKind::ObjcSource
                | SourceKind::ObjcxxSource
        )
    }

    /// The language whose toolchain compiles this kind. Only plain C headers
    /// and sources use the C toolchain; everything else, unclassified files
    /// included, goes to C++.
    pub fn language(self) -> Language {
        match self {
            SourceKind::CHeader | SourceKind::CSource => Language::C,
            _ => Language::Cxx,
        }
    }
}

fn pick(header: bool, if_header: SourceKind, if_source: SourceKind) -> SourceKind {
    if header {
        if_header
    } else {
        if_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_extension() {
        assert_eq!(SourceKind::classify(Path::new("a.c")), SourceKind::CSource);
        assert_eq!(SourceKind::classify(Path::new("a.cpp")), SourceKind::CxxSource);
        assert_eq!(SourceKind::classify(Path::new("a.CPP")), SourceKind::CxxSource);
        assert_eq!(SourceKind::classify(Path::new("a.C")), SourceKind::CxxSource);
        assert_eq!(SourceKind::classify(Path::new("a.h")), SourceKind::AmbiguousHeader);
        assert_eq!(SourceKind::classify(Path::new("a.hpp")), SourceKind::CxxHeader);
        assert_eq!(SourceKind::classify(Path::new("a.mm")), SourceKind::ObjcxxSource);
        assert_eq!(SourceKind::classify(Path::new("README")), SourceKind::Unclassified);
        assert_eq!(SourceKind::classify(Path::new("a.txt")), SourceKind::Unclassified);
    }

    #[test]
    fn language_flag_respects_header_extension() {
        assert_eq!(
            SourceKind::from_language_flag("c", Path::new("x.h")),
            SourceKind::CHeader
        );
        assert_eq!(
            SourceKind::from_language_flag("c++", Path::new("x.inc")),
            SourceKind::CxxSource
        );
        assert_eq!(
            SourceKind::from_language_flag("cuda", Path::new("x.cu")),
            SourceKind::Unclassified
        );
    }

    #[test]
    fn header_and_source_predicates() {
        assert!(SourceKind::AmbiguousHeader.is_header());
        assert!(!SourceKind::AmbiguousHeader.is_source());
        assert!(SourceKind::ObjcSource.is_source());
        assert!(!SourceKind::Unclassified.is_header());
        assert!(!SourceKind::Unclassified.is_source());
    }

    #[test]
    fn only_plain_c_uses_the_c_toolchain() {
        assert_eq!(SourceKind::CSource.language(), Language::C);
        assert_eq!(SourceKind::CHeader.language(), Language::C);
        assert_eq!(SourceKind::AmbiguousHeader.language(), Language::Cxx);
        assert_eq!(SourceKind::ObjcSource.language(), Language::Cxx);
        assert_eq!(SourceKind::Unclassified.language(), Language::Cxx);
    }
}
