use sheetsync_contracts::{AppRecord, RawCsvRecord, UserAppRecord};

use crate::identity::{is_truthy, normalize_identity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered<T> {
    pub accepted: Vec<T>,
    pub rejected: usize,
}

impl<T> Filtered<T> {
    fn partition(records: impl IntoIterator<Item = T>, keep: impl Fn(&T) -> bool) -> Self {
        let mut accepted = Vec::new();
        let mut rejected = 0;
        for record in records {
            if keep(&record) {
                accepted.push(record);
            } else {
                rejected += 1;
            }
        }
        Self { accepted, rejected }
    }
}

fn field<'a>(record: &'a RawCsvRecord, name: &str) -> &'a str {
    record.get(name).map(String::as_str).unwrap_or("")
}

fn split_app_numbers(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|ch: char| ch == ',' || ch.is_whitespace())
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn app_candidate(record: &RawCsvRecord) -> AppRecord {
    AppRecord {
        app_no: field(record, "app_no").trim().to_string(),
        label: field(record, "label").trim().to_string(),
        url: field(record, "url").trim().to_string(),
    }
}

pub fn filter_apps(records: &[RawCsvRecord]) -> Filtered<AppRecord> {
    Filtered::partition(records.iter().map(app_candidate), AppRecord::is_complete)
}

pub fn expand_user_row(record: &RawCsvRecord) -> Vec<UserAppRecord> {
    let email = normalize_identity(field(record, "email"));
    let allowed = is_truthy(field(record, "allowed"));
    let editor = is_truthy(field(record, "editor"));

    split_app_numbers(field(record, "app_no"))
        .map(|app_no| UserAppRecord {
            email: email.clone(),
            app_no: app_no.to_string(),
            allowed,
            editor,
        })
        .collect()
}

// No dedup: repeated (email, app_no) pairs are collapsed by the store's conflict key.
pub fn expand_user_rows(records: &[RawCsvRecord]) -> Vec<UserAppRecord> {
    records.iter().flat_map(expand_user_row).collect()
}

pub fn filter_user_apps(records: &[RawCsvRecord]) -> Filtered<UserAppRecord> {
    Filtered::partition(expand_user_rows(records), UserAppRecord::is_complete)
}
