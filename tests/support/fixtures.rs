use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp(extension: &str, contents: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.push(format!("divvy-test-{nanos}-{suffix}.{extension}"));
    fs::write(&path, contents).expect("write temp file");
    path
}

pub fn write_temp_config(contents: &str) -> PathBuf {
    write_temp("toml", contents)
}

pub fn write_temp_catalog(contents: &str) -> PathBuf {
    write_temp("csv", contents)
}

/// Catalog CSV in the default column layout, yields in percent.
pub const PAIR_CSV: &str = "\
Stock Name,Price per Lot (MYR),Estimated Dividend Yield (%)
A,100,5
B,200,8
";

pub const SINGLE_CSV: &str = "\
Stock Name,Price per Lot (MYR),Estimated Dividend Yield (%)
A,100,5
";
