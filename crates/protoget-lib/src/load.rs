//! Loading Go packages from disk.
//!
//! Patterns name files, directories, or directory trees (`dir/...`). Each
//! directory is one package. Import paths come from the enclosing `go.mod`.
//! Packages of the same module imported by a loaded package are loaded too, so
//! that message types declared elsewhere in the module resolve; those only
//! contribute declarations.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::program::{FileId, Program};
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Also analyze `_test.go` files.
    pub tests: bool,
    /// Also analyze files marked `// Code generated ... DO NOT EDIT.`.
    pub include_generated: bool,
}

/// Load every package matched by `patterns`.
pub fn load<S: AsRef<str>>(patterns: &[S], options: &LoadOptions) -> Result<Program> {
    let mut loader = Loader {
        options,
        program: Program::new(),
        loaded: HashSet::new(),
        pending: VecDeque::new(),
    };

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if loader.load_pattern(pattern)? == 0 {
            return Err(Error::NoGoFiles(pattern.to_owned()));
        }
    }
    loader.load_imports()?;

    tracing::debug!(
        files = loader.program.len(),
        targets = loader.program.targets().count(),
        "loaded packages"
    );
    Ok(loader.program)
}

/// A Go module: the directory holding `go.mod` and its module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub root: PathBuf,
    pub path: String,
}

impl Module {
    /// Nearest module enclosing `dir`.
    pub fn find(dir: &Path) -> Option<Module> {
        let dir = dir.canonicalize().ok()?;
        dir.ancestors().find_map(|candidate| {
            let text = std::fs::read_to_string(candidate.join("go.mod")).ok()?;
            Some(Module {
                root: candidate.to_path_buf(),
                path: module_path(&text)?,
            })
        })
    }

    /// Import path of the package in `dir`.
    pub fn import_path(&self, dir: &Path) -> Option<String> {
        let dir = dir.canonicalize().ok()?;
        let rel = dir.strip_prefix(&self.root).ok()?;
        let mut path = self.path.clone();
        for part in rel.components() {
            path.push('/');
            path.push_str(&part.as_os_str().to_string_lossy());
        }
        Some(path)
    }

    /// Directory of `import_path` when it belongs to this module.
    pub fn dir_of(&self, import_path: &str) -> Option<PathBuf> {
        if import_path == self.path {
            return Some(self.root.clone());
        }
        let rel = import_path.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(self.root.join(rel))
    }
}

/// The `module` directive of a `go.mod` file.
pub fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.split("//").next().unwrap_or(rest).trim();
        let path = rest.trim_matches('"');
        (!path.is_empty()).then(|| path.to_owned())
    })
}

struct Loader<'o> {
    options: &'o LoadOptions,
    program: Program,
    /// Canonical directories already loaded.
    loaded: HashSet<PathBuf>,
    /// Loaded files whose imports have not been followed yet.
    pending: VecDeque<(FileId, Option<Module>)>,
}

impl Loader<'_> {
    /// Returns the number of Go files matched.
    fn load_pattern(&mut self, pattern: &str) -> Result<usize> {
        let recursive_root = match pattern {
            "..." => Some("."),
            _ => pattern.strip_suffix("/..."),
        };
        if let Some(root) = recursive_root {
            let root = if root.is_empty() { "." } else { root };
            let mut matched = 0;
            for dir in package_dirs(Path::new(root))? {
                matched += self.load_dir(&dir, None, true)?;
            }
            return Ok(matched);
        }

        let path = Path::new(pattern);
        let metadata = std::fs::metadata(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.is_dir() {
            return self.load_dir(path, None, true);
        }
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.load_dir(dir, Some(path), true)
    }

    /// Loads the package in `dir`. With `only`, just that file is a target and
    /// its siblings contribute declarations. Returns the number of targets
    /// matched before generated-file filtering.
    fn load_dir(&mut self, dir: &Path, only: Option<&Path>, targets: bool) -> Result<usize> {
        let canonical = dir.canonicalize().map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let files = go_files(dir, self.options.tests)?;

        let only = only.and_then(|file| file.canonicalize().ok());
        let matched = match &only {
            Some(file) => files
                .iter()
                .filter(|f| f.canonicalize().ok().as_ref() == Some(file))
                .count(),
            None => files.len(),
        };
        if !self.loaded.insert(canonical) {
            if targets {
                self.retarget(dir, only.as_deref());
            }
            return Ok(matched);
        }

        let module = Module::find(dir);
        let package_path = module
            .as_ref()
            .and_then(|m| m.import_path(dir))
            .unwrap_or_else(|| fallback_package_path(dir, &files));

        for file in &files {
            let text = std::fs::read_to_string(file).map_err(|source| Error::Io {
                path: file.clone(),
                source,
            })?;
            let is_target = targets
                && match &only {
                    Some(only) => file.canonicalize().ok().as_ref() == Some(only),
                    None => true,
                };
            let id = self
                .program
                .add_disk_file(&package_path, file, text, is_target)?;
            if is_target && self.program.file(id).is_generated() && !self.options.include_generated
            {
                tracing::debug!(file = %file.display(), "skipping generated file");
                self.program.set_target(id, false);
            }
            self.pending.push_back((id, module.clone()));
        }
        Ok(matched)
    }

    /// Marks files of an already loaded package as targets.
    fn retarget(&mut self, dir: &Path, only: Option<&Path>) {
        let Ok(dir) = dir.canonicalize() else {
            return;
        };
        let ids: Vec<FileId> = self.program.file_ids().collect();
        for id in ids {
            let file = self.program.file(id);
            let Some(path) = file.disk_path().and_then(|p| p.canonicalize().ok()) else {
                continue;
            };
            let selected = match only {
                Some(only) => path == only,
                None => path.parent() == Some(dir.as_path()),
            };
            let skip_generated = file.is_generated() && !self.options.include_generated;
            if selected && !skip_generated {
                self.program.set_target(id, true);
            }
        }
    }

    /// Loads packages of the same module imported by loaded files.
    fn load_imports(&mut self) -> Result<()> {
        while let Some((id, module)) = self.pending.pop_front() {
            let Some(module) = module else {
                continue;
            };
            let imports: Vec<String> = self
                .program
                .file(id)
                .source()
                .imports()
                .iter()
                .filter_map(|spec| spec.path().map(str::to_owned))
                .collect();
            for import in imports {
                let Some(dir) = module.dir_of(&import) else {
                    continue;
                };
                if !dir.is_dir() || self.program.package_by_path(&import).is_some() {
                    continue;
                }
                tracing::debug!(%import, "loading imported package");
                self.load_dir(&dir, None, false)?;
            }
        }
        Ok(())
    }
}

/// Directories under `root` that contain Go files, skipping `testdata`,
/// `vendor`, and hidden or `_`-prefixed directories.
fn package_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry));

    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            Error::Io {
                path,
                source: err.into(),
            }
        })?;
        if entry.file_type().is_dir() && has_go_files(entry.path()) {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir()
        && (name == "testdata" || name == "vendor" || name.starts_with('.') || name.starts_with('_'))
}

fn has_go_files(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|entries| {
        entries
            .filter_map(|e| e.ok())
            .any(|e| is_go_file(&e.path(), true))
    })
}

/// Go files directly in `dir`, sorted by name.
fn go_files(dir: &Path, tests: bool) -> Result<Vec<PathBuf>> {
    let io_err = |source| Error::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_go_file(&path, tests) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_go_file(path: &Path, tests: bool) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && (tests || !name.ends_with("_test.go"))
}

/// Import path for packages outside any module: the package clause name,
/// or the directory name.
fn fallback_package_path(dir: &Path, files: &[PathBuf]) -> String {
    let from_clause = files.iter().find_map(|file| {
        let text = std::fs::read_to_string(file).ok()?;
        text.lines().find_map(|line| {
            let name = line.trim().strip_prefix("package ")?;
            let name = name.split_whitespace().next()?;
            Some(name.to_owned())
        })
    });
    from_clause.unwrap_or_else(|| {
        dir.canonicalize()
            .ok()
            .and_then(|d| d.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "main".to_owned())
    })
}
