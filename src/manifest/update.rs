//! Rewriting `revision` attributes in manifest files.
//!
//! The document is streamed event by event and written back verbatim
//! except for the `<project>` elements whose revision changes, so
//! comments, whitespace and attribute order survive the rewrite.

use super::ManifestUpdateSet;
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Written in front of documents that lack an XML declaration
const XML_DECLARATION: &[u8] = b"<?xml version='1.0' encoding='utf-8'?>\n";

/// UTF-8 byte order mark; kept in front of everything, declaration included
const BOM: &str = "\u{feff}";

/// One revision change applied to a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdate {
    /// Project name
    pub project: String,
    /// Previous revision (`None` if the attribute was missing)
    pub from: Option<String>,
    /// New revision
    pub to: String,
}

fn manifest_error(path: &Path, message: impl std::fmt::Display) -> Error {
    Error::Manifest {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Apply `updates` to a `<project>` start tag.
///
/// Returns the rewritten tag and the change, or `None` when the project is
/// not in the update set or already at the target revision.
fn rewrite_project(
    path: &Path,
    element: &BytesStart<'_>,
    updates: &ManifestUpdateSet,
) -> Result<Option<(BytesStart<'static>, ProjectUpdate)>> {
    let mut name = None;
    let mut revision = None;
    for attr in element.attributes() {
        let attr = attr.map_err(|e| manifest_error(path, e))?;
        let value = attr
            .unescape_value()
            .map_err(|e| manifest_error(path, e))?
            .into_owned();
        match attr.key.as_ref() {
            b"name" => name = Some(value),
            b"revision" => revision = Some(value),
            _ => {}
        }
    }

    let Some(name) = name else {
        return Ok(None);
    };
    let Some(target) = updates.get(&name) else {
        return Ok(None);
    };
    if revision.as_deref() == Some(target) {
        return Ok(None);
    }

    // Kept attributes are unescaped and escaped again, since the rewritten
    // tag always quotes with `"`
    let mut rewritten = element.to_owned();
    rewritten.clear_attributes();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| manifest_error(path, e))?;
        if attr.key.as_ref() == b"revision" {
            rewritten.push_attribute(("revision", target));
        } else {
            let key = std::str::from_utf8(attr.key.as_ref()).map_err(|e| manifest_error(path, e))?;
            let value = attr.unescape_value().map_err(|e| manifest_error(path, e))?;
            rewritten.push_attribute((key, value.as_ref()));
        }
    }
    if revision.is_none() {
        rewritten.push_attribute(("revision", target));
    }

    Ok(Some((
        rewritten,
        ProjectUpdate {
            project: name,
            from: revision,
            to: target.to_string(),
        },
    )))
}

/// Rewrite manifest `content` in memory.
///
/// Only `<project>` elements that are direct children of the root element
/// are considered. Returns `None` when nothing changes; otherwise the new
/// document (with an XML declaration) and the applied changes.
/// `path` is only used in error messages.
pub fn rewrite_manifest(
    path: &Path,
    content: &str,
    updates: &ManifestUpdateSet,
) -> Result<Option<(String, Vec<ProjectUpdate>)>> {
    let (bom, body) = content
        .strip_prefix(BOM)
        .map_or(("", content), |rest| (BOM, rest));
    let mut reader = Reader::from_str(body);
    let has_declaration = body.trim_start().starts_with("<?xml");

    let mut output = Vec::with_capacity(content.len() + XML_DECLARATION.len());
    output.extend_from_slice(bom.as_bytes());
    if !has_declaration {
        output.extend_from_slice(XML_DECLARATION);
    }
    let mut writer = Writer::new(output);

    let mut depth = 0usize;
    let mut changes = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| manifest_error(path, format!("{e} at byte {}", reader.buffer_position())))?;

        let event = match event {
            Event::Eof => break,
            Event::Start(e) => {
                let replaced = if depth == 1 && e.name().as_ref() == b"project" {
                    rewrite_project(path, &e, updates)?
                } else {
                    None
                };
                depth += 1;
                match replaced {
                    Some((rewritten, change)) => {
                        changes.push(change);
                        Event::Start(rewritten)
                    }
                    None => Event::Start(e),
                }
            }
            Event::Empty(e) => {
                let replaced = if depth == 1 && e.name().as_ref() == b"project" {
                    rewrite_project(path, &e, updates)?
                } else {
                    None
                };
                match replaced {
                    Some((rewritten, change)) => {
                        changes.push(change);
                        Event::Empty(rewritten)
                    }
                    None => Event::Empty(e),
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                Event::End(e)
            }
            other => other,
        };

        writer
            .write_event(event)
            .map_err(|e| manifest_error(path, e))?;
    }

    if changes.is_empty() {
        return Ok(None);
    }

    let document = String::from_utf8(writer.into_inner()).map_err(|e| manifest_error(path, e))?;
    Ok(Some((document, changes)))
}

/// Apply `updates` to one manifest file, writing it back only if it changed.
///
/// Returns the applied changes; empty means the file was left untouched.
pub fn update_manifest_file(path: &Path, updates: &ManifestUpdateSet) -> Result<Vec<ProjectUpdate>> {
    let content = fs::read_to_string(path)?;

    let Some((document, changes)) = rewrite_manifest(path, &content, updates)? else {
        return Ok(Vec::new());
    };

    let file_name = path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    for change in &changes {
        info!(
            "Updating {file_name}: {} from {} to {}",
            change.project,
            change.from.as_deref().unwrap_or("(none)"),
            change.to
        );
    }

    fs::write(path, document)?;
    info!("Updated {file_name}");
    Ok(changes)
}

/// Apply `updates` to every `*.<extension>` file directly inside `dir`.
///
/// Files are processed in name order; subdirectories are not scanned.
/// Returns the paths of the files that were rewritten.
pub fn update_manifest_dir(
    dir: &Path,
    updates: &ManifestUpdateSet,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let mut manifests: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    manifests.sort();

    debug!(dir = %dir.display(), count = manifests.len(), "scanning manifests");

    let mut changed = Vec::new();
    if updates.is_empty() {
        return Ok(changed);
    }

    for path in manifests {
        if !update_manifest_file(&path, updates)?.is_empty() {
            changed.push(path);
        }
    }

    Ok(changed)
}
