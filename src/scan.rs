//! File discovery and per-file extraction.
//!
//! [`scan`] expands the given paths into source files, extracts each one
//! and collects the results. A file that fails to parse is reported in
//! [`ScanReport::errors`] and does not stop the scan.

use std::fs;
use std::path::{Path, PathBuf};

use declkit_core::error::DeclkitError;
use declkit_swift::{locate, walk, FileDeclarations};
use declkit_syntax::parse_source;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error_bridges::parse_failure;

// ============================================================================
// Configuration
// ============================================================================

/// Directories never descended into.
const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    ".build",
    ".swiftpm",
    "build",
    "DerivedData",
    "Pods",
    "Carthage",
    "node_modules",
    "target",
    "*.xcassets",
];

/// Scan settings.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include, without the dot.
    pub extensions: Vec<String>,
    /// Directory names to skip (`*suffix` matches by suffix).
    pub exclude_dirs: Vec<String>,
    /// Whether to follow symlinks.
    pub follow_symlinks: bool,
    /// Maximum file size to include (bytes). Larger files are skipped.
    pub max_file_size: Option<u64>,
    /// Resolve line/column locations for every record.
    pub include_locations: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            extensions: vec!["swift".to_string()],
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect(),
            follow_symlinks: false,
            max_file_size: None,
            include_locations: true,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file extension.
    pub fn extension(mut self, extension: &str) -> Self {
        self.extensions
            .push(extension.trim_start_matches('.').to_string());
        self
    }

    /// Add an excluded directory name.
    pub fn exclude(mut self, dir: &str) -> Self {
        self.exclude_dirs.push(dir.to_string());
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Leave every location empty.
    pub fn without_locations(mut self) -> Self {
        self.include_locations = false;
        self
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|pattern| match pattern.strip_prefix('*') {
            Some(suffix) => name.ends_with(suffix),
            None => name == pattern,
        })
    }
}

// ============================================================================
// Results
// ============================================================================

/// Declarations of one file.
#[derive(Debug, Clone, Serialize)]
pub struct ScannedFile {
    /// Path as discovered, with forward slashes.
    pub path: String,
    pub declarations: FileDeclarations,
}

/// Outcome of a scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Successfully extracted files, sorted by path.
    pub files: Vec<ScannedFile>,
    /// Per-file failures, in discovery order.
    pub errors: Vec<DeclkitError>,
}

impl ScanReport {
    /// True when files were found but none could be extracted.
    pub fn all_failed(&self) -> bool {
        self.files.is_empty() && !self.errors.is_empty()
    }

    /// Total number of records across all files.
    pub fn declaration_count(&self) -> usize {
        self.files.iter().map(|f| f.declarations.len()).sum()
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Expand `paths` into the source files to extract.
///
/// Files given explicitly are always included; directories are walked and
/// filtered by extension, exclusions and size. Fails if a path does not
/// exist.
pub fn discover(paths: &[PathBuf], config: &ScanConfig) -> Result<Vec<PathBuf>, DeclkitError> {
    let mut found = Vec::new();
    for root in paths {
        if !root.exists() {
            return Err(DeclkitError::file_not_found(display_path(root)));
        }
        if root.is_file() {
            found.push(root.clone());
            continue;
        }
        let walker = WalkDir::new(root)
            .follow_links(config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !config.is_excluded_dir(&e.file_name().to_string_lossy())
            });
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(display_path).unwrap_or_default();
                DeclkitError::internal(format!("failed to walk {}: {}", path, e))
            })?;
            if !entry.file_type().is_file() || !config.has_extension(entry.path()) {
                continue;
            }
            if let Some(max_size) = config.max_file_size {
                let len = entry
                    .metadata()
                    .map_err(|e| DeclkitError::internal(e.to_string()))?
                    .len();
                if len > max_size {
                    debug!(path = %entry.path().display(), len, "skipping large file");
                    continue;
                }
            }
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Parse one file and collect its declarations.
pub fn extract_file(path: &Path, config: &ScanConfig) -> Result<ScannedFile, DeclkitError> {
    let shown = display_path(path);
    let source = fs::read_to_string(path).map_err(|e| DeclkitError::io(&shown, e))?;
    let tree = parse_source(&source).map_err(|e| parse_failure(&shown, &source, &e))?;
    let mut declarations = walk(&tree);
    let buffer = config.include_locations.then_some(source.as_str());
    locate(&mut declarations, buffer);
    debug!(path = %shown, declarations = declarations.len(), "extracted file");
    Ok(ScannedFile {
        path: shown,
        declarations,
    })
}

/// Discover and extract every file under `paths`.
pub fn scan(paths: &[PathBuf], config: &ScanConfig) -> Result<ScanReport, DeclkitError> {
    let files = discover(paths, config)?;
    let mut report = ScanReport::default();
    for path in &files {
        match extract_file(path, config) {
            Ok(file) => report.files.push(file),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping file");
                report.errors.push(err);
            }
        }
    }
    report.files.sort_by(|a, b| a.path.cmp(&b.path));
    info!(
        files = report.files.len(),
        failed = report.errors.len(),
        declarations = report.declaration_count(),
        "scan complete"
    );
    Ok(report)
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}
