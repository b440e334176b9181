use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::docs::DocumentationSource;
use crate::error::{InjectError, Result};
use crate::models::{ValidationError, ValidationStatus};
use crate::resolver::Resolver;
use crate::validator::Validator;

/// Outcome of a build: a failed file is reported but never written.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, InjectError)>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct FileValidation {
    pub path: PathBuf,
    pub status: ValidationStatus,
    pub errors: Vec<ValidationError>,
}

/// Every `*.html` file below `dir`, sorted.
pub fn discover_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            InjectError::io(path, e.into())
        })?;
        let is_html = entry.path().extension().is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
        if entry.file_type().is_file() && is_html {
            pages.push(entry.into_path());
        }
    }
    pages.sort();
    Ok(pages)
}

/// Resolves every page under `src` and writes the result to the same
/// relative path under `dest`, with at most `concurrency` files in flight.
pub async fn build<V, D>(
    resolver: &Resolver<V, D>,
    src: &Path,
    dest: &Path,
    concurrency: usize,
) -> Result<BuildReport>
where
    V: Validator,
    D: DocumentationSource,
{
    let pages = discover_pages(src)?;
    info!("Building {} page(s) from {} into {}", pages.len(), src.display(), dest.display());

    let outcomes: Vec<(PathBuf, Result<PathBuf>)> = stream::iter(pages)
        .map(move |page| async move {
            let outcome = build_page(resolver, src, dest, &page).await;
            (page, outcome)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = BuildReport::default();
    for (page, outcome) in outcomes {
        match outcome {
            Ok(written) => report.written.push(written),
            Err(e) => {
                error!("{}: {}", page.display(), e);
                report.failed.push((page, e));
            }
        }
    }
    report.written.sort();
    report.failed.sort_by(|a, b| a.0.cmp(&b.0));
    info!("Wrote {} page(s), {} failed", report.written.len(), report.failed.len());
    Ok(report)
}

async fn build_page<V, D>(
    resolver: &Resolver<V, D>,
    src: &Path,
    dest: &Path,
    page: &Path,
) -> Result<PathBuf>
where
    V: Validator,
    D: DocumentationSource,
{
    debug!("Processing {}", page.display());
    let raw = tokio::fs::read_to_string(page)
        .await
        .map_err(|e| InjectError::io(page, e))?;
    let html = resolver.process(&raw).await?;

    let relative = page.strip_prefix(src).unwrap_or(page);
    let out = dest.join(relative);
    if let Some(parent) = out.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| InjectError::io(parent, e))?;
    }
    tokio::fs::write(&out, html)
        .await
        .map_err(|e| InjectError::io(&out, e))?;
    debug!("Wrote {}", out.display());
    Ok(out)
}

/// Copies every file below `src` to the same relative path under `dest`.
/// A missing `src` copies nothing.
pub async fn copy_assets(src: &Path, dest: &Path) -> Result<usize> {
    if !tokio::fs::try_exists(src).await.map_err(|e| InjectError::io(src, e))? {
        debug!("No assets at {}", src.display());
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            InjectError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let out = dest.join(relative);
        if let Some(parent) = out.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| InjectError::io(parent, e))?;
        }
        tokio::fs::copy(entry.path(), &out)
            .await
            .map_err(|e| InjectError::io(entry.path(), e))?;
        copied += 1;
    }
    info!("Copied {} asset(s) from {} into {}", copied, src.display(), dest.display());
    Ok(copied)
}

/// Validates every page under `dir`. Any invocation failure aborts.
pub async fn validate_dir<V: Validator>(validator: &V, dir: &Path) -> Result<Vec<FileValidation>> {
    let mut results = Vec::new();
    for page in discover_pages(dir)? {
        let html = tokio::fs::read_to_string(&page)
            .await
            .map_err(|e| InjectError::io(&page, e))?;
        let result = validator.validate(&html).await?;
        if result.passed() {
            debug!("{}: PASS", page.display());
        } else {
            warn!("{}: {} error(s)", page.display(), result.errors.len());
        }
        results.push(FileValidation {
            path: page,
            status: result.status,
            errors: result.errors,
        });
    }
    Ok(results)
}

/// Removes everything inside `dir`, keeping the directory itself.
pub async fn clean(dir: &Path) -> Result<usize> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(InjectError::io(dir, e)),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await.map_err(|e| InjectError::io(dir, e))? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(|e| InjectError::io(&path, e))?;
        let removal = if file_type.is_dir() {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };
        removal.map_err(|e| InjectError::io(&path, e))?;
        removed += 1;
    }
    info!("Removed {} item(s) from {}", removed, dir.display());
    Ok(removed)
}
