//! Document processing: open a PDF, rasterise every page, tally pixels.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the whole per-document
//! sequence onto the blocking thread pool so worker tasks never stall the
//! Tokio executor during CPU-heavy rendering.
//!
//! ## Handle lifetime
//!
//! The open `PdfDocument` is owned by the blocking closure and is released
//! when it drops, on the success path and on every `?` alike. Nothing
//! outside the closure ever sees the handle.

use crate::config::AnalysisConfig;
use crate::error::WhiteMeterError;
use crate::pipeline::classify::{self, PageTally};
use crate::stats::DocumentStats;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Analyse one document: render every page and count white pixels.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
///
/// # Errors
/// Any failure is fatal for this document: preflight
/// ([`WhiteMeterError::FileNotFound`], [`WhiteMeterError::PermissionDenied`],
/// [`WhiteMeterError::NotAPdf`]), open ([`WhiteMeterError::CorruptPdf`]) or
/// per-page rasterisation ([`WhiteMeterError::RenderFailed`]). No page is
/// retried.
pub async fn process_document(
    path: &Path,
    config: &AnalysisConfig,
) -> Result<DocumentStats, WhiteMeterError> {
    let path = path.to_path_buf();
    let max_pixels = config.max_rendered_pixels;
    let dump_dir = config.dump_dir.clone();

    tokio::task::spawn_blocking(move || {
        process_document_blocking(&path, max_pixels, dump_dir.as_deref())
    })
    .await
    .map_err(|e| WhiteMeterError::Internal(format!("Document task panicked: {e}")))?
}

/// Blocking implementation of per-document analysis.
fn process_document_blocking(
    pdf_path: &Path,
    max_pixels: u32,
    dump_dir: Option<&Path>,
) -> Result<DocumentStats, WhiteMeterError> {
    preflight(pdf_path)?;

    let pdfium = Pdfium::default();
    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| WhiteMeterError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    let name = base_name(pdf_path);
    debug!("{}: {} pages", pdf_path.display(), total_pages);

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut tally = PageTally::default();
    for idx in 0..total_pages {
        let render_failed = |detail: String| WhiteMeterError::RenderFailed {
            path: pdf_path.to_path_buf(),
            page: idx + 1,
            detail,
        };

        let page = pages
            .get(idx as u16)
            .map_err(|e| render_failed(format!("{e:?}")))?;
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| render_failed(format!("{e:?}")))?;
        let image = bitmap.as_image();

        if let Some(dir) = dump_dir {
            dump_page(dir, &name, idx, &image)?;
        }

        let page_tally = classify::tally_image(&image);
        debug!(
            "{}: page {} -> {}x{} px, {} white / {} non-white",
            name,
            idx + 1,
            image.width(),
            image.height(),
            page_tally.white,
            page_tally.non_white
        );
        tally.absorb(page_tally);
    }

    // `document` drops here, releasing the pdfium handle; the `?` exits
    // above release it the same way
    Ok(DocumentStats::new(name, tally.white, tally.non_white))
}

/// Validate the path before handing it to pdfium, so callers get a precise
/// error instead of an opaque load failure: the file must exist, be
/// readable, and start with the `%PDF` magic bytes.
fn preflight(path: &Path) -> Result<(), WhiteMeterError> {
    if !path.exists() {
        return Err(WhiteMeterError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(WhiteMeterError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(WhiteMeterError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(WhiteMeterError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// Display key for a document: its base file name.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write a rendered page into the dump directory as `{name}-{page:03}.png`.
fn dump_page(
    dir: &Path,
    name: &str,
    idx: usize,
    image: &DynamicImage,
) -> Result<(), WhiteMeterError> {
    let file: PathBuf = dir.join(format!("{name}-{idx:03}.png"));
    image
        .save(&file)
        .map_err(|e| WhiteMeterError::PageDumpFailed {
            path: file,
            detail: e.to_string(),
        })?;
    debug!("Dumped page render to {}", dir.display());
    Ok(())
}
