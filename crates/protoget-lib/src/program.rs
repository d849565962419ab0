//! Parsed Go sources grouped into packages.

use std::path::{Path, PathBuf};

use protoget_syntax::SourceFile;

use crate::Result;

/// Handle to a file in a `Program`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a package in a `Program`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct PackageId(u32);

impl PackageId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct GoFile {
    name: String,
    disk_path: Option<PathBuf>,
    package: PackageId,
    source: SourceFile,
    generated: bool,
    target: bool,
}

impl GoFile {
    /// Display name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location on disk, for files read by the loader.
    pub fn disk_path(&self) -> Option<&Path> {
        self.disk_path.as_deref()
    }

    pub fn package(&self) -> PackageId {
        self.package
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Whether diagnostics are reported for this file. Other files only
    /// contribute declarations.
    pub fn is_target(&self) -> bool {
        self.target
    }
}

#[derive(Debug)]
pub struct Package {
    path: String,
    name: String,
    files: Vec<FileId>,
}

impl Package {
    /// Import path, e.g. `example.com/internal/proto`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name from the `package` clause of its first file.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[FileId] {
        &self.files
    }
}

/// Every source the type resolver may consult, with analysis targets marked.
#[derive(Debug, Default)]
pub struct Program {
    files: Vec<GoFile>,
    packages: Vec<Package>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add a file to the package with the given import path.
    ///
    /// Generated files are added as dependencies only; see `set_target`.
    pub fn add_file(
        &mut self,
        package_path: &str,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<FileId> {
        let source = SourceFile::parse(text)?;
        let generated = source.is_generated();
        Ok(self.push(package_path, name.into(), None, source, !generated))
    }

    /// Parse and add a file that only contributes declarations.
    pub fn add_dependency_file(
        &mut self,
        package_path: &str,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<FileId> {
        let source = SourceFile::parse(text)?;
        Ok(self.push(package_path, name.into(), None, source, false))
    }

    pub(crate) fn add_disk_file(
        &mut self,
        package_path: &str,
        path: &Path,
        text: String,
        target: bool,
    ) -> Result<FileId> {
        let source = SourceFile::parse(text)?;
        let name = path.display().to_string();
        Ok(self.push(
            package_path,
            name,
            Some(path.to_path_buf()),
            source,
            target,
        ))
    }

    fn push(
        &mut self,
        package_path: &str,
        name: String,
        disk_path: Option<PathBuf>,
        source: SourceFile,
        target: bool,
    ) -> FileId {
        let id = FileId(self.files.len() as u32);
        let package = match self.package_by_path(package_path) {
            Some(pkg) => pkg,
            None => {
                let pkg = PackageId(self.packages.len() as u32);
                self.packages.push(Package {
                    path: package_path.to_owned(),
                    name: source.package_name().unwrap_or_default().to_owned(),
                    files: Vec::new(),
                });
                pkg
            }
        };
        self.packages[package.index()].files.push(id);
        let generated = source.is_generated();
        self.files.push(GoFile {
            name,
            disk_path,
            package,
            source,
            generated,
            target,
        });
        id
    }

    pub fn set_target(&mut self, file: FileId, target: bool) {
        self.files[file.index()].target = target;
    }

    pub fn file(&self, id: FileId) -> &GoFile {
        &self.files[id.index()]
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub fn package_by_path(&self, path: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .position(|p| p.path == path)
            .map(|i| PackageId(i as u32))
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, p)| (PackageId(i as u32), p))
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len()).map(|i| FileId(i as u32))
    }

    pub fn targets(&self) -> impl Iterator<Item = FileId> + '_ {
        self.file_ids().filter(|id| self.file(*id).target)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
