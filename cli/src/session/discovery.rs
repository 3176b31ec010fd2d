//! Source file discovery for lint runs.
//!
//! Walks each root with gitignore support, keeps files with a TypeScript or
//! JavaScript extension and reads them in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use ignore::WalkBuilder;
use rayon::prelude::*;
use waitcheck_analysis::{SkippedFile, SourceFile};
use waitcheck_core::types::context::Language;

/// Files found under the requested roots.
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    pub files: Vec<SourceFile>,
    /// Files that matched but could not be read as UTF-8.
    pub unreadable: Vec<SkippedFile>,
}

impl DiscoveredFiles {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub struct FileDiscovery {
    roots: Vec<PathBuf>,
}

impl FileDiscovery {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Walk every root and read the matching files.
    ///
    /// A root that does not exist is an error. A root that is a file is
    /// linted as long as its extension is supported.
    pub fn discover(&self) -> Result<DiscoveredFiles> {
        let mut paths = Vec::new();
        for root in &self.roots {
            if !root.exists() {
                bail!("Path does not exist: {}", root.display());
            }
            paths.extend(Self::walk(root));
        }
        paths.sort();
        paths.dedup();
        log::debug!("Discovered {} candidate files", paths.len());

        let results: Vec<Result<SourceFile, SkippedFile>> =
            paths.par_iter().filter_map(|path| Self::read(path)).collect();

        let mut discovered = DiscoveredFiles::default();
        for result in results {
            match result {
                Ok(file) => discovered.files.push(file),
                Err(skipped) => discovered.unreadable.push(skipped),
            }
        }
        Ok(discovered)
    }

    fn walk(root: &Path) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .require_git(false) // Don't require .git directory for gitignore support
            .add_custom_ignore_filename(".gitignore")
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                match entry.file_name().to_str() {
                    Some(name) if is_dir => !Self::should_skip_directory(name),
                    _ => true,
                }
            })
            .build();

        walker
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
            .map(|e| e.into_path())
            .filter(|path| Self::is_lintable(path))
            .collect()
    }

    fn is_lintable(path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        // declaration files carry no runtime code
        if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
            return false;
        }
        Language::from_path(name).is_some()
    }

    /// `None` for paths that are not lintable after all.
    fn read(path: &Path) -> Option<Result<SourceFile, SkippedFile>> {
        let display = path.to_string_lossy().into_owned();
        match fs::read_to_string(path) {
            Ok(content) => SourceFile::from_path_and_content(display, content).map(Ok),
            Err(e) => {
                log::debug!("Skipping {}: {}", display, e);
                Some(Err(SkippedFile {
                    path: display,
                    reason: e.to_string(),
                }))
            }
        }
    }

    fn should_skip_directory(name: &str) -> bool {
        name == "node_modules"
            || name == "dist"
            || name == "build"
            || name == "coverage"
            || name == "out"
            || name == "vendor"
    }
}
