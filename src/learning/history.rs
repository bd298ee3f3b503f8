use super::suggest::{average_parameters, default_parameters, is_similar_image, LearnedParameters};
use super::ParameterMap;
use crate::error::FeedbackError;
use crate::image::io::ensure_parent_dir;
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub image_path: String,
    pub parameters: ParameterMap,
    pub rating: u8,
    #[serde(default)]
    pub user_notes: Option<String>,
    /// RFC 3339 local time of the rating.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl FeedbackEntry {
    pub fn timestamp(&self) -> Option<DateTime<chrono::FixedOffset>> {
        self.timestamp
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStatistics {
    pub total_feedback: usize,
    pub average_rating: f64,
    /// Count per star rating, keys 1..=5.
    pub rating_distribution: BTreeMap<u8, usize>,
    pub most_recent: Option<String>,
}

/// Feedback entries backed by a JSON file.
#[derive(Clone, Debug)]
pub struct FeedbackHistory {
    path: PathBuf,
    entries: Vec<FeedbackEntry>,
}

impl FeedbackHistory {
    /// Load `path`. A missing file is an empty history; an unreadable or
    /// corrupt one is logged and treated as empty too.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            match fs::read_to_string(&path)
                .map_err(FeedbackError::from)
                .and_then(|s| serde_json::from_str(&s).map_err(FeedbackError::from))
            {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        "FeedbackHistory: could not load {}: {err}; starting empty",
                        path.display()
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        debug!("FeedbackHistory: {} entries from {}", entries.len(), path.display());
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save(&self) -> Result<(), FeedbackError> {
        ensure_parent_dir(&self.path)?;
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }

    /// Record a rating and persist the history immediately.
    pub fn add(
        &mut self,
        image_path: impl Into<String>,
        parameters: ParameterMap,
        rating: u8,
        user_notes: Option<String>,
    ) -> Result<(), FeedbackError> {
        if !(1..=5).contains(&rating) {
            return Err(FeedbackError::InvalidRating(rating));
        }
        self.entries.push(FeedbackEntry {
            image_path: image_path.into(),
            parameters,
            rating,
            user_notes,
            timestamp: Some(Local::now().to_rfc3339()),
        });
        self.save()
    }

    /// Average parameters of entries rated at least `min_rating`.
    pub fn suggested_parameters(&self, image: Option<&Path>, min_rating: u8) -> LearnedParameters {
        let good: Vec<&FeedbackEntry> = self
            .entries
            .iter()
            .filter(|e| e.rating >= min_rating)
            .collect();
        if good.is_empty() {
            return default_parameters();
        }
        let similar: Vec<&FeedbackEntry> = match image {
            Some(query) => good
                .iter()
                .copied()
                .filter(|e| is_similar_image(Path::new(&e.image_path), query))
                .collect(),
            None => Vec::new(),
        };
        if similar.is_empty() {
            average_parameters(&good)
        } else {
            average_parameters(&similar)
        }
    }

    pub fn statistics(&self) -> FeedbackStatistics {
        if self.entries.is_empty() {
            return FeedbackStatistics::default();
        }
        let mut distribution: BTreeMap<u8, usize> = (1..=5).map(|r| (r, 0)).collect();
        let mut sum = 0u64;
        for e in &self.entries {
            *distribution.entry(e.rating).or_default() += 1;
            sum += e.rating as u64;
        }
        FeedbackStatistics {
            total_feedback: self.entries.len(),
            average_rating: sum as f64 / self.entries.len() as f64,
            rating_distribution: distribution,
            most_recent: self.entries.last().and_then(|e| e.timestamp.clone()),
        }
    }

    /// Forget everything and delete the backing file.
    pub fn clear(&mut self) -> Result<(), FeedbackError> {
        self.entries.clear();
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
