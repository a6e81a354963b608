#![allow(dead_code)]

use chrono::{Local, NaiveDate, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "x").unwrap();
    path
}

/// Create a file and pin its last write time to a local date and hour.
pub fn touch_at(dir: &Path, name: &str, day: NaiveDate, hour: u32) -> PathBuf {
    let path = touch(dir, name);
    let local = Local
        .from_local_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
        .unwrap();
    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::from(local)).unwrap();
    path
}

pub fn subdir(root: &Path, name: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
