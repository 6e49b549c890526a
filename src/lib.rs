pub mod types;
pub mod helpers;
pub mod logger;
pub mod file_map;
pub mod extract;
pub mod assemble;
pub mod fingerprint;
pub mod verify;
pub mod ingest;

pub mod db;

use std::fs::create_dir_all;
use std::path::PathBuf;
use std::error::Error;
use app_dirs::{get_app_root, AppDataType, AppInfo};

/// Book code used for the Bhagavad-gita As It Is (1972 edition) records.
pub static GITA_BOOK_CODE: &'static str = "BG";

/// The Gita has 18 chapters; header text outside this range is not a chapter marker.
pub static GITA_CHAPTER_COUNT: u32 = 18;

/// Expected number of verse records for the full book.
pub static GITA_VERSE_TOTAL: u32 = 700;

pub const APP_INFO: AppInfo = AppInfo { name: "vedabase", author: "vedabase" };

pub fn get_create_vedabase_app_root() -> Result<PathBuf, Box<dyn Error>> {
    // VEDABASE_DIR overrides the platform data dir, mainly for tests and scripted runs.
    if let Ok(s) = std::env::var("VEDABASE_DIR") {
        let p = PathBuf::from(s);
        if !p.exists() {
            create_dir_all(&p)?;
        }
        return Ok(p);
    }

    let p = get_app_root(AppDataType::UserData, &APP_INFO)?;
    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}

pub fn get_create_vedabase_db_path() -> PathBuf {
    let p = get_create_vedabase_app_root().unwrap_or(PathBuf::from("."));
    p.join("vedabase.sqlite3")
}
