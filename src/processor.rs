//! Template tree processing.
//! Walks the template directory, renders every relative path into its
//! destination path, creates directories, and renders file contents into
//! freshly created files. Processing is sequential and fail-fast: the first
//! error stops the walk and whatever was already written stays on disk.

use crate::binding::BindingTable;
use crate::error::{Error, Result};
use crate::prune::prune;
use crate::renderer::TemplateRenderer;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Something observable that happened while processing the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// A directory now exists at this path, relative to the output root.
    DirectoryCreated(PathBuf),
    /// A file was rendered at this path, relative to the output root.
    FileRendered(PathBuf),
    /// A file rendered blank and was removed again.
    FilePruned(PathBuf),
}

/// Renders a template directory into an output directory.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    template_dir: &'a Path,
    output_dir: &'a Path,
    bindings: &'a BindingTable,
}

impl<'a> Processor<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        template_dir: &'a Path,
        output_dir: &'a Path,
        bindings: &'a BindingTable,
    ) -> Self {
        Self { renderer, template_dir, output_dir, bindings }
    }

    /// Processes every entry of the template directory in lexical order.
    ///
    /// # Arguments
    /// * `observer` - Receives an event for each directory and file produced
    ///
    /// # Errors
    /// Any template, prompt, or filesystem error aborts the walk.
    pub fn run(&self, observer: &mut dyn FnMut(RenderEvent)) -> Result<()> {
        debug!(
            "Processing template {} into {}",
            self.template_dir.display(),
            self.output_dir.display()
        );
        fs::create_dir_all(self.output_dir).map_err(|e| Error::path("create", self.output_dir, e))?;

        for entry in WalkDir::new(self.template_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            self.process(entry.path(), entry.file_type().is_dir(), observer)?;
        }
        Ok(())
    }

    /// Renders every name and every file of the template without touching
    /// the output directory.
    ///
    /// # Returns
    /// * `Result<usize>` - Number of entries checked
    pub fn dry_run(&self) -> Result<usize> {
        let mut checked = 0;
        for entry in WalkDir::new(self.template_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let (relative, _) = self.target_of(entry.path())?;
            if !entry.file_type().is_dir() {
                let content = fs::read_to_string(entry.path())
                    .map_err(|e| Error::path("read", entry.path(), e))?;
                let rendered = self.renderer.render_to(
                    &relative,
                    &content,
                    &self.bindings.to_context(),
                    &mut io::sink(),
                );
                self.checked(rendered)?;
            }
            checked += 1;
        }
        Ok(checked)
    }

    /// Renders the template-relative path of `source` into its
    /// output-relative counterpart.
    fn target_of(&self, source: &Path) -> Result<(String, PathBuf)> {
        let relative = source
            .strip_prefix(self.template_dir)
            .map_err(|e| Error::TemplateError(e.to_string()))?;
        let relative = relative.to_str().ok_or_else(|| {
            Error::TemplateError(format!("'{}' is not valid UTF-8", relative.display()))
        })?;

        debug!("Processing source entry: {relative}");
        let rendered =
            self.checked(self.renderer.render(relative, relative, &self.bindings.to_context()))?;
        let target = resolve_target_path(relative, &rendered)?;
        Ok((relative.to_string(), target))
    }

    fn process(&self, source: &Path, is_dir: bool, observer: &mut dyn FnMut(RenderEvent)) -> Result<()> {
        let (relative, relative_target) = self.target_of(source)?;
        let target = self.output_dir.join(&relative_target);
        debug!("Processed target entry: {}", target.display());

        if is_dir {
            create_dir(&target)?;
            observer(RenderEvent::DirectoryCreated(relative_target));
            return Ok(());
        }

        self.render_file(source, &relative, &target)?;
        if prune(&target)? {
            observer(RenderEvent::FilePruned(relative_target));
        } else {
            observer(RenderEvent::FileRendered(relative_target));
        }
        Ok(())
    }

    fn render_file(&self, source: &Path, name: &str, target: &Path) -> Result<()> {
        let content = fs::read_to_string(source).map_err(|e| Error::path("read", source, e))?;
        let file = replace_file(source, target)?;

        let mut out = BufWriter::new(file);
        let rendered =
            self.renderer.render_to(name, &content, &self.bindings.to_context(), &mut out);
        self.checked(rendered)?;
        out.flush().map_err(|e| Error::path("write", target, e))?;
        Ok(())
    }

    /// Fails a render whose lookups hit a resolution error, even when the
    /// template tolerated the missing value through `default` or
    /// `is defined`. The stashed error wins over the one the engine reports.
    fn checked<T>(&self, rendered: Result<T>) -> Result<T> {
        match self.bindings.take_failure() {
            Some(failure) => Err(failure),
            None => rendered,
        }
    }
}

/// Checks a rendered relative path and returns it as a `PathBuf`.
///
/// # Arguments
/// * `source_path` - The template-relative path before rendering
/// * `rendered` - The same path after rendering
///
/// # Errors
/// * `Error::InvalidRenderedPath` if `rendered` is empty, absolute, has an
///   empty segment, or contains `.` or `..` segments
pub fn resolve_target_path(source_path: &str, rendered: &str) -> Result<PathBuf> {
    let invalid = || Error::InvalidRenderedPath {
        source_path: source_path.to_string(),
        rendered: rendered.to_string(),
    };

    let bad_segment = |segment: &str| {
        let segment = segment.trim();
        segment.is_empty() || segment == "." || segment == ".."
    };
    if rendered.split(['/', '\\']).any(bad_segment) {
        return Err(invalid());
    }

    let path = PathBuf::from(rendered);
    if !path.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(invalid());
    }
    Ok(path)
}

fn create_dir(path: &Path) -> Result<()> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::path("create", path, e)),
    }
}

/// Removes whatever file sits at `target` and creates a new one carrying the
/// permissions of `source`.
fn replace_file(source: &Path, target: &Path) -> Result<File> {
    match fs::remove_file(target) {
        Ok(()) => debug!("Replacing existing file {}", target.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::path("remove", target, e)),
    }

    let permissions = fs::metadata(source)
        .map_err(|e| Error::path("stat", source, e))?
        .permissions();

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(permissions.mode());
    }

    let file = options.open(target).map_err(|e| Error::path("create", target, e))?;
    #[cfg(not(unix))]
    file.set_permissions(permissions).map_err(|e| Error::path("chmod", target, e))?;
    Ok(file)
}
