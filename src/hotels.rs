use std::fs;
use std::path::Path;

use crate::errors::AppResult;
use crate::models::Hotel;

/// Loads the input hotel list. This is the one failure in the system that is
/// allowed to abort a run; everything downstream degrades and continues.
pub fn load_hotels(path: &Path) -> AppResult<Vec<Hotel>> {
    let text = fs::read_to_string(path)?;
    let hotels = serde_json::from_str(&text)?;
    Ok(hotels)
}
