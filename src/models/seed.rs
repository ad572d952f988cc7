//! Reference data loaded out of band.
//!
//! Movies only ever point at genres, people, countries and languages that already
//! exist; this file format is how those rows get into the database.
//!
//! ```toml
//! genres = ["Drama", "Science Fiction"]
//! countries = ["United States"]
//! languages = ["English", "Japanese"]
//! people = ["Christopher Nolan", "Leonardo DiCaprio"]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub people: Vec<String>,
}

impl SeedData {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse seed file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_default_to_empty() {
        let seed: SeedData = toml::from_str(r#"genres = ["Drama"]"#).unwrap();
        assert_eq!(seed.genres, vec!["Drama".to_string()]);
        assert!(seed.people.is_empty());
        assert!(seed.countries.is_empty());
    }
}
