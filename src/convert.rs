//! Per-document pipeline: scan, resolve, plan, fetch, write, rebuild.
//!
//! Paths given to the pipeline are interpreted relative to
//! [`Relocation::working_dir`]. Any failure aborts the document; images
//! already written for earlier references stay on disk, and the document
//! itself is only overwritten once every reference has been relocated.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Error;
use crate::fetcher::ByteSource;
use crate::markup::TagMarkup;
use crate::planner;
use crate::rebuilder::DocumentRebuilder;
use crate::resolver;
use crate::scanner;
use crate::types::{Reference, Relocation, RelocationPlan};
use crate::writer;

/// Outcome of converting one document.
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Destination of every relocated image, in scan order.
    pub images: Vec<PathBuf>,
}

impl ConversionReport {
    /// Number of references rewritten.
    pub fn references(&self) -> usize {
        return self.images.len();
    }
}

/// Fill in the document path on errors raised by the pure pipeline stages.
fn attach_document(e: Error, document: &Path) -> Error {
    let Error::MalformedReference { raw, reason, .. } = e else {
        return e;
    };
    return Error::MalformedReference {
        document: document.to_path_buf(),
        raw,
        reason,
    };
}

/// Convert one document in place.
///
/// A document without references is left untouched.
///
/// # Errors
///
/// Returns `Error::DocumentNotFound` or `Error::DocumentUnreadable` if the
/// document cannot be read, `Error::MalformedReference` for a reference that
/// does not resolve, `Error::FetchFailed` when image bytes cannot be obtained,
/// or `Error::WriteFailed` when an image or the document cannot be written.
pub fn convert_document(
    path: &Path,
    relocation: &Relocation,
    source: &dyn ByteSource,
    markup: &dyn TagMarkup,
) -> Result<ConversionReport, Error> {
    let disk_path = relocation.working_dir.join(path);
    let text = read_document(&disk_path, path)?;
    let document_dir = path.parent().unwrap_or(Path::new(""));

    let mut rebuilder = DocumentRebuilder::new(&text);
    let mut report = ConversionReport::default();

    for reference in scanner::scan(&text) {
        let planned = relocate_reference(&reference, relocation, document_dir, source, markup)
            .map_err(|e| return attach_document(e, path))?;
        if report.images.contains(&planned.destination_path) {
            debug!(
                destination = %planned.destination_path.display(),
                "destination already written for this document, overwriting"
            );
        }
        rebuilder.replace(reference.range(), &planned.replacement_reference_text);
        report.images.push(planned.destination_path);
    }

    if report.images.is_empty() {
        debug!(document = %path.display(), "no image references");
        return Ok(report);
    }

    writer::write_document(&disk_path, &rebuilder.finish())?;
    info!(document = %path.display(), references = report.references(), "document rewritten");
    return Ok(report);
}

/// Create the image directory if absent. Failure is fatal for the whole run.
///
/// # Errors
///
/// Returns `Error::ImageDirUnavailable` if the directory cannot be created.
pub fn prepare_image_dir(relocation: &Relocation) -> Result<(), Error> {
    let path = relocation.working_dir.join(&relocation.image_dir);
    return std::fs::create_dir_all(&path).map_err(|e| {
        return Error::ImageDirUnavailable {
            path: relocation.image_dir.clone(),
            reason: e.to_string(),
        };
    });
}

/// Read the document as UTF-8 text.
///
/// # Errors
///
/// Returns `Error::DocumentNotFound` if missing, `Error::DocumentUnreadable` otherwise.
fn read_document(disk_path: &Path, shown: &Path) -> Result<String, Error> {
    return match std::fs::read_to_string(disk_path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::DocumentNotFound { path: shown.to_path_buf() })
        },
        Err(e) => Err(Error::DocumentUnreadable {
            path: shown.to_path_buf(),
            reason: e.to_string(),
        }),
        Ok(text) => Ok(text),
    };
}

/// Resolve, plan, fetch, and write the image for one reference.
///
/// # Errors
///
/// Returns resolution, fetch, or write errors for this reference.
fn relocate_reference(
    reference: &Reference,
    relocation: &Relocation,
    document_dir: &Path,
    source: &dyn ByteSource,
    markup: &dyn TagMarkup,
) -> Result<RelocationPlan, Error> {
    let resolved = resolver::resolve(reference, markup)?;
    let planned = planner::plan(&resolved, relocation, document_dir, markup)?;
    debug!(
        kind = reference.kind_name(),
        raw = reference.raw_text(),
        label = resolved.label.as_deref().unwrap_or(""),
        source = %resolved.source_location,
        destination = %planned.destination_path.display(),
        "relocating image"
    );

    let bytes = source.fetch(&resolved.source_location, &relocation.working_dir.join(document_dir))?;
    writer::write_image(&relocation.working_dir.join(&planned.destination_path), &bytes)?;
    return Ok(planned);
}
