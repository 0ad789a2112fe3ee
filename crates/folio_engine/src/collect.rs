use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use folio_logging::{folio_debug, folio_warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    #[error("folder not found: {0}")]
    NotFound(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A regular file discovered under the job root.
///
/// Ghost entries are listed in the project tree but their content is not
/// converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    relative: PathBuf,
    ghost: bool,
}

impl FileEntry {
    pub fn new(path: PathBuf, relative: PathBuf) -> Self {
        Self {
            path,
            relative,
            ghost: false,
        }
    }

    pub fn ghost(path: PathBuf, relative: PathBuf) -> Self {
        Self {
            path,
            relative,
            ghost: true,
        }
    }

    pub fn is_ghost(&self) -> bool {
        self.ghost
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Display label: the relative path with `/` separators on every platform.
    pub fn label(&self) -> String {
        let parts: Vec<_> = self
            .relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        parts.join("/")
    }
}

/// Which file extensions are converted.
///
/// Parsed from a comma separated list: `.rs,.md` includes only those,
/// `!lock,!png` excludes those, both may be mixed. `*` or an empty
/// string converts everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl ExtensionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return Self::all();
        }
        let mut filter = Self::default();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.strip_prefix('!') {
                Some(ext) => filter.exclude.insert(normalize_extension(ext)),
                None => filter.include.insert(normalize_extension(part)),
            };
        }
        filter
    }

    pub fn is_all(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn allows(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        if !self.include.is_empty() && !self.include.contains(&ext) {
            return false;
        }
        !self.exclude.contains(&ext)
    }
}

fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.').to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Wildcard patterns (`*`, `?`) matched against every relative path component.
    pub ignore: Vec<String>,
    /// Files outside the filter are yielded as ghosts.
    pub extensions: ExtensionFilter,
    /// Files and folders to convert, relative to the root or absolute.
    /// Empty selects everything.
    pub select: Vec<PathBuf>,
    /// Yield unselected files as ghosts instead of dropping them.
    pub include_ghosts: bool,
    /// Sort entries by file name at each directory level.
    pub sort: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            extensions: ExtensionFilter::all(),
            select: Vec::new(),
            include_ghosts: false,
            sort: true,
        }
    }
}

/// Check that `root` exists and is a directory, returning its canonical form.
pub fn check_root(root: &Path) -> Result<PathBuf, CollectError> {
    let meta = fs::metadata(root).map_err(|_| CollectError::NotFound(root.to_path_buf()))?;
    if !meta.is_dir() {
        return Err(CollectError::NotADirectory(root.to_path_buf()));
    }
    Ok(fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf()))
}

/// Start a lazy walk over every regular file below `root`.
pub fn collect_files(root: &Path, options: CollectOptions) -> Result<FileWalk, CollectError> {
    let root = check_root(root)?;
    let mut walker = WalkDir::new(&root).min_depth(1).follow_links(false);
    if options.sort {
        walker = walker.sort_by_file_name();
    }
    folio_debug!("Collecting files under {:?}", root);
    let selection = (!options.select.is_empty())
        .then(|| resolve_selection(&root, &options.select));
    Ok(FileWalk {
        root,
        inner: walker.into_iter(),
        options,
        selection,
        skipped_errors: 0,
    })
}

/// Turn selected paths into root-relative prefixes. Paths outside the root
/// select nothing.
fn resolve_selection(root: &Path, select: &[PathBuf]) -> Vec<PathBuf> {
    select
        .iter()
        .filter_map(|path| {
            let relative = if path.is_absolute() {
                let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                match absolute.strip_prefix(root) {
                    Ok(relative) => relative.to_path_buf(),
                    Err(_) => {
                        folio_warn!("Selected path {:?} is outside {:?}", path, root);
                        return None;
                    }
                }
            } else {
                path.clone()
            };
            Some(
                relative
                    .components()
                    .filter(|c| matches!(c, Component::Normal(_)))
                    .collect::<PathBuf>(),
            )
        })
        .collect()
}

/// Iterator returned by [`collect_files`]. Not restartable.
pub struct FileWalk {
    root: PathBuf,
    inner: walkdir::IntoIter,
    options: CollectOptions,
    selection: Option<Vec<PathBuf>>,
    skipped_errors: usize,
}

impl FileWalk {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries the walk could not read (e.g. a directory without permission).
    pub fn skipped_errors(&self) -> usize {
        self.skipped_errors
    }
}

impl Iterator for FileWalk {
    type Item = FileEntry;

    fn next(&mut self) -> Option<FileEntry> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    folio_warn!("Skipping unreadable entry: {}", err);
                    self.skipped_errors += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if is_ignored_name(&entry.file_name().to_string_lossy(), &self.options.ignore) {
                    self.inner.skip_current_dir();
                }
                continue;
            }
            // Directory links stay unfollowed; links to files are read through.
            let is_file = if file_type.is_symlink() {
                fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file())
            } else {
                file_type.is_file()
            };
            if !is_file {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path().to_path_buf());
            if is_ignored(&relative, &self.options.ignore) {
                continue;
            }
            let selected = self
                .selection
                .as_ref()
                .map_or(true, |prefixes| prefixes.iter().any(|p| relative.starts_with(p)));
            if !selected {
                if self.options.include_ghosts {
                    return Some(FileEntry::ghost(entry.into_path(), relative));
                }
                continue;
            }
            if !self.options.extensions.allows(&relative) {
                return Some(FileEntry::ghost(entry.into_path(), relative));
            }
            return Some(FileEntry::new(entry.into_path(), relative));
        }
    }
}

/// True when any component of `relative` matches one of `patterns`.
pub fn is_ignored(relative: &Path, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }
    relative.components().any(|c| match c {
        Component::Normal(part) => is_ignored_name(&part.to_string_lossy(), patterns),
        _ => false,
    })
}

fn is_ignored_name(name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| wildcard_match(p, name))
}

/// Shell-style match: `*` is any run of characters, `?` exactly one.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p).copied() {
            Some('*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star_p, star_t)) => {
                    p = star_p + 1;
                    t = star_t + 1;
                    backtrack = Some((star_p, star_t + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
