use claimfile_core::filler::{fill_pdf, form_fields, FieldKind, FillError};
use claimfile_core::mapper::{build_field_mapping, fields::*, FieldMapping};
use claimfile_core::{FormSubmission, TriState};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

// ── In-memory templates ──────────────────────────────────────────────────

fn text_field(doc: &mut Document, name: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Tx",
        "T" => Object::string_literal(name),
        "Rect" => vec![0.into(), 0.into(), 200.into(), 20.into()],
    })
}

fn checkbox(doc: &mut Document, name: &str, on_state: &str) -> ObjectId {
    let on = doc.add_object(Stream::new(dictionary! {}, b"0 g".to_vec()));
    let off = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => "Btn",
        "T" => Object::string_literal(name),
        "AS" => "Off",
        "AP" => dictionary! {
            "N" => dictionary! { on_state => on, "Off" => off },
        },
    })
}

/// Wraps `fields` in a one-page document with an AcroForm.
fn finish(mut doc: Document, fields: Vec<ObjectId>, extra_form: Option<(&str, Object)>) -> Vec<u8> {
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let mut form = dictionary! {
        "Fields" => fields.into_iter().map(Object::Reference).collect::<Vec<_>>(),
    };
    if let Some((key, value)) = extra_form {
        form.set(key, value);
    }
    let form_id = doc.add_object(form);
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => form_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn template(text: &[&str], boxes: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let mut ids = Vec::new();
    for name in text {
        ids.push(text_field(&mut doc, name));
    }
    for name in boxes {
        ids.push(checkbox(&mut doc, name, "1"));
    }
    finish(doc, ids, None)
}

fn field_dict<'a>(doc: &'a Document, name: &str) -> &'a lopdf::Dictionary {
    doc.objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .find(|d| matches!(d.get(b"T"), Ok(Object::String(t, _)) if t == name.as_bytes()))
        .unwrap()
}

fn name_of<'a>(dict: &'a lopdf::Dictionary, key: &[u8]) -> &'a [u8] {
    match dict.get(key).unwrap() {
        Object::Name(n) => n,
        _ => panic!("{} is not a name", String::from_utf8_lossy(key)),
    }
}

fn submission() -> FormSubmission {
    FormSubmission {
        plaintiff_name: "Dana Reyes".into(),
        plaintiff_street: "12 Elm St".into(),
        plaintiff_city: "Oakland".into(),
        plaintiff_state: "CA".into(),
        plaintiff_zip: "94607".into(),
        defendant_name: "Bay Movers LLC".into(),
        defendant_street: "400 Market St".into(),
        defendant_city: "San Francisco".into(),
        defendant_state: "CA".into(),
        defendant_zip: "94105".into(),
        claim_type: "property-damage".into(),
        claim_amount: "2400".into(),
        claim_reason: "Movers broke a dresser".into(),
        asked_for_payment: TriState::Yes,
        jurisdiction_reason: "defendant-lives".into(),
        agree_to_terms: true,
        signature_date: "2026-10-01".into(),
        ..Default::default()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[test]
fn fills_present_fields_and_reports_the_rest_as_missing() {
    let pdf = template(
        &[P1_NAME, D_NAME, CLAIM_AMOUNT],
        &[CB_ASKED_YES, CB_ASKED_NO],
    );
    let mapping = build_field_mapping(&submission());
    let filled = fill_pdf(&pdf, &mapping).unwrap();

    let report = &filled.report;
    assert_eq!(report.filled, 5);
    assert_eq!(report.attempted, mapping.attempted());
    assert_eq!(report.missing.len(), report.attempted - 5);
    assert!(report.failed.is_empty());
    assert!(report.missing.iter().any(|m| m == P1_STREET));

    let doc = Document::load_mem(&filled.bytes).unwrap();
    let name = field_dict(&doc, P1_NAME);
    assert_eq!(name.get(b"V").unwrap().as_str().unwrap(), b"Dana Reyes");
    let amount = field_dict(&doc, CLAIM_AMOUNT);
    assert_eq!(amount.get(b"V").unwrap().as_str().unwrap(), b"2400.00");

    let yes = field_dict(&doc, CB_ASKED_YES);
    assert_eq!(name_of(yes, b"V"), b"1");
    assert_eq!(name_of(yes, b"AS"), b"1");
    let no = field_dict(&doc, CB_ASKED_NO);
    assert_eq!(name_of(no, b"V"), b"Off");
    assert_eq!(name_of(no, b"AS"), b"Off");
}

#[test]
fn type_mismatch_is_tallied_not_fatal() {
    // Plaintiff name declared as a button, defendant name as text.
    let mut doc = Document::with_version("1.7");
    let wrong = checkbox(&mut doc, P1_NAME, "Yes");
    let right = text_field(&mut doc, D_NAME);
    let pdf = finish(doc, vec![wrong, right], None);

    let filled = fill_pdf(&pdf, &build_field_mapping(&submission())).unwrap();
    assert_eq!(filled.report.filled, 1);
    assert_eq!(filled.report.failed.len(), 1);
    assert_eq!(filled.report.failed[0].0, P1_NAME);
    assert!(filled.report.failed[0].1.contains("expected a text field"));
}

#[test]
fn sets_need_appearances_and_drops_xfa() {
    let mut doc = Document::with_version("1.7");
    let id = text_field(&mut doc, "plain");
    let xfa = doc.add_object(Stream::new(dictionary! {}, b"<xdp/>".to_vec()));
    let pdf = finish(doc, vec![id], Some(("XFA", Object::Reference(xfa))));

    let mapping = FieldMapping {
        text: vec![("plain", "José Peña".into())],
        checkboxes: Vec::new(),
    };
    let filled = fill_pdf(&pdf, &mapping).unwrap();
    assert_eq!(filled.report.filled, 1);

    let doc = Document::load_mem(&filled.bytes).unwrap();
    let catalog = doc.catalog().unwrap();
    let form_id = catalog.get(b"AcroForm").unwrap().as_reference().unwrap();
    let form = doc.get_dictionary(form_id).unwrap();
    assert!(matches!(form.get(b"NeedAppearances"), Ok(Object::Boolean(true))));
    assert!(!form.has(b"XFA"));

    let value = field_dict(&doc, "plain").get(b"V").unwrap().as_str().unwrap();
    assert_eq!(&value[..2], &[0xFE, 0xFF]);
}

#[test]
fn hierarchical_names_are_joined_and_types_inherited() {
    let mut doc = Document::with_version("1.7");
    let parent_id = doc.new_object_id();
    let child = doc.add_object(dictionary! {
        "T" => Object::string_literal("Name[0]"),
        "Parent" => parent_id,
    });
    let widget = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "Parent" => parent_id,
    });
    doc.objects.insert(
        parent_id,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("Page1[0]"),
            "FT" => "Tx",
            "Kids" => vec![child.into(), widget.into()],
        }),
    );
    let pdf = finish(doc, vec![parent_id], None);

    let fields = form_fields(&pdf).unwrap();
    assert_eq!(fields, vec![("Page1[0].Name[0]".to_string(), FieldKind::Text)]);
}

#[test]
fn cyclic_kids_are_walked_once() {
    let mut doc = Document::with_version("1.7");
    let looped = doc.new_object_id();
    doc.objects.insert(
        looped,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("Loop"),
            "FT" => "Tx",
            "Kids" => vec![looped.into(), looped.into()],
        }),
    );
    let name = text_field(&mut doc, D_NAME);
    let pdf = finish(doc, vec![looped, name], None);

    let mapping = FieldMapping {
        text: vec![(D_NAME, "Bay Movers LLC".into())],
        checkboxes: Vec::new(),
    };
    let filled = fill_pdf(&pdf, &mapping).unwrap();
    assert_eq!(filled.report.filled, 1);
    assert!(filled.report.failed.is_empty());

    let fields = form_fields(&pdf).unwrap();
    assert_eq!(fields, vec![(D_NAME.to_string(), FieldKind::Text)]);
}

#[test]
fn document_without_a_form_is_rejected() {
    let mut doc = Document::with_version("1.7");
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog" });
    doc.trailer.set("Root", catalog_id);
    let mut pdf = Vec::new();
    doc.save_to(&mut pdf).unwrap();

    let err = fill_pdf(&pdf, &FieldMapping::default()).err();
    assert!(matches!(err, Some(FillError::NoAcroForm)));
}
