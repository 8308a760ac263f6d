//! Shared fixtures for integration tests
#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use str_docsearch::error::{DocSearchError, DocSearchResult};
use str_docsearch::translate::Translator;

/// Column names of the all lower-case registration export
pub const LOWER_CASE_HEADERS: [&str; 19] = [
    "srocode",
    "internaldocumentnumber",
    "docno",
    "docname",
    "registrationdate",
    "sroname",
    "micrno",
    "bank_type",
    "party_code",
    "sellerparty",
    "purchaserparty",
    "propertydescription",
    "areaname",
    "consideration_amt",
    "marketvalue",
    "dateofexecution",
    "stampdutypaid",
    "registrationfees",
    "status",
];

/// Column names of the mixed-case registration export, in its own order
pub const MIXED_CASE_HEADERS: [&str; 19] = [
    "SROCode",
    "InternalDocumentNumber",
    "DocNo",
    "DocName",
    "RegistrationDate",
    "SROName",
    "SellerParty",
    "PurchaserParty",
    "PropertyDescription",
    "AreaName",
    "consideration_amt",
    "MarketValue",
    "DateOfExecution",
    "StampDutyPaid",
    "RegistrationFees",
    "status",
    "micrno",
    "party_code",
    "bank_type",
];

/// Serialize a one-sheet workbook of string cells
pub fn workbook_bytes(headers: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Write a workbook to `dir/name`
pub fn write_workbook(dir: &Path, name: &str, headers: &[&str], rows: &[Vec<&str>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, workbook_bytes(headers, rows)).unwrap();
    path
}

/// A document-details row for `headers`, filled from `values` by column name
/// (case-insensitive); unnamed columns get a placeholder
pub fn record<'a>(headers: &[&'a str], values: &[(&str, &'a str)]) -> Vec<&'a str> {
    headers
        .iter()
        .map(|h| {
            values
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(h))
                .map(|(_, v)| *v)
                .unwrap_or("-")
        })
        .collect()
}

/// Dictionary translator recording every call
pub struct FakeTranslator {
    words: HashMap<String, String>,
    broken: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTranslator {
    pub fn new(words: &[(&str, &str)]) -> Self {
        Self {
            words: words
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            broken: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Texts that always fail to translate
    pub fn failing_on(mut self, texts: &[&str]) -> Self {
        self.broken = texts.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Translator for FakeTranslator {
    fn translate(&self, text: &str, _source: &str, _target: &str) -> DocSearchResult<String> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.broken.iter().any(|b| b == text) {
            return Err(DocSearchError::Translation(format!("cannot translate {}", text)));
        }
        Ok(self
            .words
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string()))
    }
}
