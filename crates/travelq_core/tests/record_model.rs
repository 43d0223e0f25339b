use travelq_core::{Record, RecordValidationError};

#[test]
fn new_keeps_fields_verbatim() {
    let record = Record::new("A1", "G", "Title", "Titre", "Name", "Purpose").unwrap();

    assert_eq!(record.ref_number, "A1");
    assert_eq!(record.disclosure_group, "G");
    assert_eq!(record.title_en, "Title");
    assert_eq!(record.title_fr, "Titre");
    assert_eq!(record.name, "Name");
    assert_eq!(record.purpose_en, "Purpose");
}

#[test]
fn new_rejects_blank_ref_number() {
    let err = Record::new(" \t", "G", "T", "T", "N", "P").unwrap_err();
    assert_eq!(err, RecordValidationError::EmptyRefNumber);
}

#[test]
fn from_fields_requires_exactly_six_fields() {
    let record = Record::from_fields(&["A1", "G", "T", "T", "N", "P"]).unwrap();
    assert_eq!(record.ref_number, "A1");

    let err = Record::from_fields(&["A1", "G"]).unwrap_err();
    assert_eq!(
        err,
        RecordValidationError::FieldCount {
            expected: 6,
            actual: 2
        }
    );
    assert!(Record::from_fields(&["A1", "G", "T", "T", "N", "P", "X"]).is_err());
}

#[test]
fn serialization_uses_table_column_names() {
    let record = Record::new("A1", "G", "TEN", "TFR", "N", "P").unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["ref_number"], "A1");
    assert_eq!(json["disclosure_group"], "G");
    assert_eq!(json["title_en"], "TEN");
    assert_eq!(json["title_fr"], "TFR");
    assert_eq!(json["name"], "N");
    assert_eq!(json["purpose_en"], "P");
}
