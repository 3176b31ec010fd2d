use serde::{Deserialize, Serialize};

/// Languages whose test files we can analyze.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Typescript,
    Javascript,
}

impl Language {
    /// Map a file path to a language by extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "ts" | "tsx" | "mts" | "cts" => Some(Language::Typescript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::Javascript),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Typescript => "typescript",
            Language::Javascript => "javascript",
        }
    }
}

/// A source file handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub language: Language,
    pub content: String,
}

impl SourceFile {
    /// Build a source file, inferring the language from the path.
    pub fn from_path_and_content(path: impl Into<String>, content: impl Into<String>) -> Option<Self> {
        let path = path.into();
        let language = Language::from_path(&path)?;
        Some(Self {
            path,
            language,
            content: content.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_typescript_extensions() {
        assert_eq!(Language::from_path("a.test.ts"), Some(Language::Typescript));
        assert_eq!(Language::from_path("a.test.tsx"), Some(Language::Typescript));
        assert_eq!(Language::from_path("a.spec.MTS"), Some(Language::Typescript));
    }

    #[test]
    fn test_language_from_javascript_extensions() {
        assert_eq!(Language::from_path("a.test.js"), Some(Language::Javascript));
        assert_eq!(Language::from_path("a.test.jsx"), Some(Language::Javascript));
        assert_eq!(Language::from_path("setup.cjs"), Some(Language::Javascript));
    }

    #[test]
    fn test_language_rejects_unknown_extensions() {
        assert_eq!(Language::from_path("README.md"), None);
        assert_eq!(Language::from_path("Makefile"), None);
    }

    #[test]
    fn test_language_serializes_lowercase() {
        let json = serde_json::to_string(&Language::Typescript).unwrap();
        assert_eq!(json, "\"typescript\"");
    }

    #[test]
    fn test_source_file_infers_language() {
        let sf = SourceFile::from_path_and_content("Form.test.jsx", "render(<Form />)").unwrap();
        assert_eq!(sf.language, Language::Javascript);
        assert!(SourceFile::from_path_and_content("notes.txt", "").is_none());
    }
}
