use travelq_core::db::open_db_in_memory;
use travelq_core::{Record, RecordRepository, SearchCriteria, SearchField, SqliteRecordRepository};

fn seed(repo: &SqliteRecordRepository<'_>) {
    let rows = [
        ("R1", "Travel", "John Smith"),
        ("R2", "Hospitality", "Anna Smithers"),
        ("R3", "Travel", "Li Wei"),
        ("R4", "Travel 100%", "Ann_Smith"),
    ];
    for (key, group, name) in rows {
        let record = Record::new(key, group, "Title", "Titre", name, "Purpose").unwrap();
        repo.create_record(&record).unwrap();
    }
}

fn keys(records: Vec<Record>) -> Vec<String> {
    let mut keys = records
        .into_iter()
        .map(|record| record.ref_number)
        .collect::<Vec<_>>();
    keys.sort();
    keys
}

#[test]
fn single_column_search_matches_substring() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    seed(&repo);

    let criteria = SearchCriteria::new().with(SearchField::Name, "Smith");
    let hits = repo.search_records(&criteria).unwrap();

    assert_eq!(keys(hits), vec!["R1", "R2", "R4"]);
}

#[test]
fn multiple_columns_are_combined_with_and() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    seed(&repo);

    let criteria = SearchCriteria::new()
        .with(SearchField::Name, "Smith")
        .with(SearchField::DisclosureGroup, "Travel");
    let hits = repo.search_records(&criteria).unwrap();

    assert_eq!(keys(hits), vec!["R1", "R4"]);
}

#[test]
fn wildcard_characters_in_terms_match_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    seed(&repo);

    let percent = SearchCriteria::new().with(SearchField::DisclosureGroup, "100%");
    assert_eq!(keys(repo.search_records(&percent).unwrap()), vec!["R4"]);

    let underscore = SearchCriteria::new().with(SearchField::Name, "n_S");
    assert_eq!(keys(repo.search_records(&underscore).unwrap()), vec!["R4"]);
}

#[test]
fn quote_in_term_is_bound_not_interpolated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    seed(&repo);

    let criteria = SearchCriteria::new().with(SearchField::Name, "' OR '1'='1");
    assert!(repo.search_records(&criteria).unwrap().is_empty());
    assert_eq!(repo.count_records().unwrap(), 4);
}

#[test]
fn search_without_match_returns_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRecordRepository::new(&conn);
    seed(&repo);

    let criteria = SearchCriteria::new().with(SearchField::PurposeEn, "Unrelated");
    assert!(repo.search_records(&criteria).unwrap().is_empty());
}
