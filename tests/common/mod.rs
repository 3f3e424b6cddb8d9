#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use spendlog::{config::Config, AppContext};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Four entries as copied from Internetbanken, newest first.
pub static MARCH_STATEMENT: Lazy<String> = Lazy::new(|| {
    [
        statement_block("Systembolaget", "2025-03-25", "-100,00", "24 550,00"),
        statement_block("ICA SUPERMARKET", "2025-03-24", "-300,00", "24 650,00"),
        statement_block("ICA NARA", "2025-03-24", "-50,00", "24 950,00"),
        statement_block("SALARY SYSTEM", "2025-03-01", "25 000,00", "25 000,00"),
    ]
    .concat()
});

/// Nine-line block in the Internetbanken layout.
pub fn statement_block(alias: &str, date: &str, amount: &str, balance: &str) -> String {
    format!("{alias}\n\n{date}\n\n{date}\n\n{amount}\n\n{balance}\n")
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn template_context() -> AppContext {
    AppContext::with_config(&Config::template())
}

/// Creates an isolated directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Writes `content` to a fresh file and returns its path.
pub fn write_file(name: &str, content: &str) -> PathBuf {
    let path = temp_dir().join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}
