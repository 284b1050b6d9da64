//! Candidate records returned by the book search service
//!
//! Fields the service leaves out or sends as `null` decode to empty values.
//! Whether a candidate is usable is decided later by [`CandidateBook::validate`],
//! so one incomplete record never rejects the whole response.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<CandidateBook>,
}

/// A book as described by the search service, not yet stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateBook {
    /// Identifier on the search service; informational only
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<CandidateAuthor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default)]
    pub download_count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateAuthor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub death_year: Option<i32>,
}

impl CandidateBook {
    /// First listed author. Only this one is catalogued.
    pub fn primary_author(&self) -> Option<&CandidateAuthor> {
        self.authors.first()
    }

    /// First listed language code. Only this one is catalogued.
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }

    /// Case-insensitive substring match on the title.
    pub fn title_contains(&self, fragment: &str) -> bool {
        self.title
            .to_lowercase()
            .contains(&fragment.to_lowercase())
    }

    /// Check that the candidate carries everything needed to catalogue it.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("missing title".to_string());
        }

        match self.primary_author() {
            None => return Err("no authors listed".to_string()),
            Some(author) if author.name.trim().is_empty() => {
                return Err("first author has no name".to_string())
            }
            Some(_) => {}
        }

        match self.primary_language() {
            Some(language) if !language.trim().is_empty() => {}
            _ => return Err("no language listed".to_string()),
        }

        if let Some(count) = self.download_count {
            if !count.is_finite() || count < 0.0 {
                return Err(format!("invalid download count {}", count));
            }
        }

        Ok(())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
