//! Writes a [`FieldMapping`] into the AcroForm of a PDF template.

use std::collections::{BTreeMap, HashSet};

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::mapper::FieldMapping;

const MAX_FIELD_DEPTH: usize = 32;

/// Failures that make the whole template unusable.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("failed to parse PDF template: {0}")]
    Parse(String),
    #[error("PDF template has no interactive form")]
    NoAcroForm,
    #[error("failed to save filled PDF: {0}")]
    Save(String),
}

/// Failures scoped to one field; logged and tallied, never fatal.
#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("field not found in template")]
    NotFound,
    #[error("expected a {expected} field, found {found}")]
    TypeMismatch {
        expected: FieldKind,
        found: FieldKind,
    },
    #[error("malformed field dictionary: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Button,
    Choice,
    Signature,
    Unknown,
}

impl FieldKind {
    fn from_ft(ft: Option<&[u8]>) -> Self {
        match ft {
            Some(b"Tx") => FieldKind::Text,
            Some(b"Btn") => FieldKind::Button,
            Some(b"Ch") => FieldKind::Choice,
            Some(b"Sig") => FieldKind::Signature,
            _ => FieldKind::Unknown,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FieldKind::Text => "text",
            FieldKind::Button => "button",
            FieldKind::Choice => "choice",
            FieldKind::Signature => "signature",
            FieldKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A terminal form field and the widget annotations that draw it.
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: ObjectId,
    pub kind: FieldKind,
    pub widgets: Vec<ObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillReport {
    pub attempted: usize,
    pub filled: usize,
    pub missing: Vec<String>,
    pub failed: Vec<(String, String)>,
}

pub struct FilledPdf {
    pub bytes: Vec<u8>,
    pub report: FillReport,
}

// ── Object helpers ───────────────────────────────────────────────────────

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}

fn name_of(obj: Option<&Object>) -> Option<&[u8]> {
    match obj {
        Some(Object::Name(n)) => Some(n.as_slice()),
        _ => None,
    }
}

/// PDF text string → Rust string (UTF-16BE with BOM, else PDFDocEncoding≈Latin-1).
fn decode_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

fn encode_text(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn catalog_id(doc: &Document) -> Result<ObjectId, FillError> {
    match doc.trailer.get(b"Root") {
        Ok(Object::Reference(id)) => Ok(*id),
        _ => Err(FillError::Parse("trailer has no /Root reference".into())),
    }
}

fn acroform<'a>(doc: &'a Document) -> Result<&'a Dictionary, FillError> {
    let catalog = doc
        .get_object(catalog_id(doc)?)
        .ok()
        .and_then(|o| o.as_dict().ok())
        .ok_or_else(|| FillError::Parse("document catalog is not a dictionary".into()))?;
    let form = catalog.get(b"AcroForm").map_err(|_| FillError::NoAcroForm)?;
    resolve_dict(doc, form).ok_or(FillError::NoAcroForm)
}

// ── Field discovery ──────────────────────────────────────────────────────

/// Every terminal field keyed by its fully-qualified name.
pub fn collect_fields(doc: &Document) -> Result<BTreeMap<String, FormField>, FillError> {
    let form = acroform(doc)?;
    let roots = form
        .get(b"Fields")
        .ok()
        .and_then(|f| resolve(doc, f))
        .and_then(|f| f.as_array().ok())
        .ok_or(FillError::NoAcroForm)?;

    let mut walk = FieldWalk {
        doc,
        seen: HashSet::new(),
        out: BTreeMap::new(),
    };
    for root in roots {
        if let Object::Reference(id) = root {
            walk.visit(*id, "", None, 0);
        }
    }
    Ok(walk.out)
}

struct FieldWalk<'a> {
    doc: &'a Document,
    /// Each field object is visited once, so shared or cyclic `/Kids` stay finite.
    seen: HashSet<ObjectId>,
    out: BTreeMap<String, FormField>,
}

impl<'a> FieldWalk<'a> {
    fn visit(
        &mut self,
        id: ObjectId,
        parent_name: &str,
        inherited_ft: Option<&'a [u8]>,
        depth: usize,
    ) {
        let doc = self.doc;
        if depth > MAX_FIELD_DEPTH {
            warn!(?id, "field tree too deep, skipping");
            return;
        }
        if !self.seen.insert(id) {
            warn!(?id, "field visited twice, skipping");
            return;
        }
        let Some(dict) = doc.get_object(id).ok().and_then(|o| o.as_dict().ok()) else {
            return;
        };

        let name = match dict.get(b"T") {
            Ok(Object::String(t, _)) => {
                let partial = decode_text(t);
                if parent_name.is_empty() {
                    partial
                } else {
                    format!("{parent_name}.{partial}")
                }
            }
            _ => parent_name.to_string(),
        };
        let ft = name_of(dict.get(b"FT").ok()).or(inherited_ft);

        let kids: Vec<ObjectId> = dict
            .get(b"Kids")
            .ok()
            .and_then(|k| resolve(doc, k))
            .and_then(|k| k.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .filter_map(|o| match o {
                        Object::Reference(r) => Some(*r),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let (child_fields, widgets): (Vec<ObjectId>, Vec<ObjectId>) =
            kids.into_iter().partition(|kid| {
                doc.get_object(*kid)
                    .ok()
                    .and_then(|o| o.as_dict().ok())
                    .map(|d| d.has(b"T"))
                    .unwrap_or(false)
            });

        if !child_fields.is_empty() {
            for kid in child_fields {
                self.visit(kid, &name, ft, depth + 1);
            }
            return;
        }

        if name.is_empty() {
            return;
        }
        // A field without widget kids is merged with its own widget annotation.
        let widgets = if widgets.is_empty() { vec![id] } else { widgets };
        self.out.insert(
            name,
            FormField {
                id,
                kind: FieldKind::from_ft(ft),
                widgets,
            },
        );
    }
}

/// Names and kinds of every fillable field in a template.
pub fn form_fields(template: &[u8]) -> Result<Vec<(String, FieldKind)>, FillError> {
    let doc = Document::load_mem(template).map_err(|e| FillError::Parse(e.to_string()))?;
    Ok(collect_fields(&doc)?
        .into_iter()
        .map(|(name, f)| (name, f.kind))
        .collect())
}

// ── Writing values ───────────────────────────────────────────────────────

fn dict_mut(doc: &mut Document, id: ObjectId) -> Result<&mut Dictionary, FieldError> {
    doc.get_object_mut(id)
        .map_err(|e| FieldError::Malformed(e.to_string()))?
        .as_dict_mut()
        .map_err(|e| FieldError::Malformed(e.to_string()))
}

fn set_text(doc: &mut Document, field: &FormField, value: &str) -> Result<(), FieldError> {
    if field.kind != FieldKind::Text {
        return Err(FieldError::TypeMismatch {
            expected: FieldKind::Text,
            found: field.kind,
        });
    }
    dict_mut(doc, field.id)?.set("V", encode_text(value));
    Ok(())
}

/// The widget's "on" appearance state: the first `/AP /N` key that is not `Off`.
fn on_state(doc: &Document, widget: ObjectId) -> Option<Vec<u8>> {
    let dict = doc.get_object(widget).ok()?.as_dict().ok()?;
    let ap = resolve_dict(doc, dict.get(b"AP").ok()?)?;
    let normal = resolve_dict(doc, ap.get(b"N").ok()?)?;
    normal
        .iter()
        .map(|(k, _)| k)
        .find(|k| k.as_slice() != b"Off")
        .cloned()
}

fn set_checkbox(doc: &mut Document, field: &FormField, checked: bool) -> Result<(), FieldError> {
    if field.kind != FieldKind::Button {
        return Err(FieldError::TypeMismatch {
            expected: FieldKind::Button,
            found: field.kind,
        });
    }

    let states: Vec<(ObjectId, Option<Vec<u8>>)> = field
        .widgets
        .iter()
        .map(|w| (*w, on_state(doc, *w)))
        .collect();
    let field_on = states
        .iter()
        .find_map(|(_, s)| s.clone())
        .unwrap_or_else(|| b"Yes".to_vec());

    for (widget, state) in &states {
        let appearance = match (checked, state) {
            (true, Some(on)) => on.clone(),
            (true, None) => field_on.clone(),
            (false, _) => b"Off".to_vec(),
        };
        dict_mut(doc, *widget)?.set("AS", Object::Name(appearance));
    }

    let value = if checked { field_on } else { b"Off".to_vec() };
    dict_mut(doc, field.id)?.set("V", Object::Name(value));
    Ok(())
}

/// Asks viewers to regenerate appearances and drops XFA so AcroForm values render.
fn finish_acroform(doc: &mut Document) -> Result<(), FillError> {
    let root = catalog_id(doc)?;
    let form_ref = doc
        .get_object(root)
        .ok()
        .and_then(|o| o.as_dict().ok())
        .and_then(|c| c.get(b"AcroForm").ok())
        .and_then(|f| match f {
            Object::Reference(id) => Some(*id),
            _ => None,
        });

    let form = match form_ref {
        Some(id) => doc
            .get_object_mut(id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|_| FillError::NoAcroForm)?,
        None => doc
            .get_object_mut(root)
            .and_then(|o| o.as_dict_mut())
            .and_then(|c| c.get_mut(b"AcroForm"))
            .and_then(|f| f.as_dict_mut())
            .map_err(|_| FillError::NoAcroForm)?,
    };
    form.set("NeedAppearances", Object::Boolean(true));
    if form.remove(b"XFA").is_some() {
        debug!("removed XFA form data from template");
    }
    Ok(())
}

fn record(name: &str, result: Result<(), FieldError>, report: &mut FillReport) {
    match result {
        Ok(()) => report.filled += 1,
        Err(FieldError::NotFound) => {
            warn!(field = %name, "field not found in template");
            report.missing.push(name.to_string());
        }
        Err(e) => {
            warn!(field = %name, "failed to fill field: {e}");
            report.failed.push((name.to_string(), e.to_string()));
        }
    }
}

/// Fills `template` with `mapping`. Only an unreadable template or a failed
/// save is an error; every per-field problem lands in the report.
pub fn fill_pdf(template: &[u8], mapping: &FieldMapping) -> Result<FilledPdf, FillError> {
    let mut doc = Document::load_mem(template).map_err(|e| FillError::Parse(e.to_string()))?;
    let fields = collect_fields(&doc)?;
    let mut report = FillReport::default();

    for (name, value) in &mapping.text {
        if value.is_empty() {
            continue;
        }
        report.attempted += 1;
        let result = match fields.get(*name) {
            Some(field) => set_text(&mut doc, field, value),
            None => Err(FieldError::NotFound),
        };
        record(name, result, &mut report);
    }

    for (name, condition) in &mapping.checkboxes {
        let Some(checked) = condition else {
            continue;
        };
        report.attempted += 1;
        let result = match fields.get(*name) {
            Some(field) => set_checkbox(&mut doc, field, *checked),
            None => Err(FieldError::NotFound),
        };
        record(name, result, &mut report);
    }

    finish_acroform(&mut doc)?;

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| FillError::Save(e.to_string()))?;

    info!(
        attempted = report.attempted,
        filled = report.filled,
        missing = report.missing.len(),
        failed = report.failed.len(),
        "filled PDF form"
    );
    Ok(FilledPdf { bytes, report })
}
