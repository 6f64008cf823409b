use std::fmt;
use std::path::PathBuf;

use reqwest::Client;
use study_core::model::StudyContent;
use tracing::{info, instrument};

use crate::error::ContentError;

/// Where the content file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Url(String),
}

impl ContentSource {
    /// `http://` and `https://` values are URLs; anything else is a path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::File(path) => write!(f, "{}", path.display()),
            ContentSource::Url(url) => f.write_str(url),
        }
    }
}

/// Fetches and parses the study content file.
#[derive(Clone, Default)]
pub struct ContentService {
    client: Client,
}

impl ContentService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Load the content once.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the file cannot be read, the request fails or
    /// returns a non-success status, or the body is not valid content JSON.
    #[instrument(level = "info", skip_all, fields(%source))]
    pub async fn load(&self, source: &ContentSource) -> Result<StudyContent, ContentError> {
        let raw = match source {
            ContentSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|err| ContentError::Io {
                        path: path.clone(),
                        source: err,
                    })?
            }
            ContentSource::Url(url) => {
                let response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(ContentError::HttpStatus(response.status()));
                }
                response.text().await?
            }
        };

        let content = parse_content(&raw)?;
        info!(
            lectures = content.lectures.len(),
            flashcards = content.flashcards.len(),
            questions = content.quiz.len(),
            "content loaded"
        );
        Ok(content)
    }
}

/// Parse content JSON.
///
/// # Errors
///
/// Returns `ContentError::Parse` if the text is not valid content JSON.
pub fn parse_content(raw: &str) -> Result<StudyContent, ContentError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_detects_urls() {
        assert_eq!(
            ContentSource::parse("https://example.org/data.json"),
            ContentSource::Url("https://example.org/data.json".into())
        );
        assert_eq!(
            ContentSource::parse(" data.json "),
            ContentSource::File(PathBuf::from("data.json"))
        );
    }

    #[test]
    fn parse_reads_short_field_names() {
        let content = parse_content(
            r#"{
                "lectures": [{"id": 1, "title": "Intro"}],
                "flashcards": [{"f": "Port", "b": "Left"}],
                "quiz": [{"q": "Side?", "o": ["Port", "Starboard"], "c": 0, "e": "Port is left."}]
            }"#,
        )
        .unwrap();

        assert_eq!(content.total_items(), 3);
        assert_eq!(content.flashcards[0].back, "Left");
        assert!(content.quiz[0].is_correct(0));
    }

    #[test]
    fn parse_tolerates_loose_lectures_and_null_collections() {
        let string_id = parse_content(r#"{"lectures":[{"id":"m1","title":"Intro"}]}"#).unwrap();
        assert_eq!(string_id.lectures.len(), 1);
        assert_eq!(string_id.lectures[0].title.as_deref(), Some("Intro"));

        let plain = parse_content(r#"{"lectures":["Intro","Chapter 1"]}"#).unwrap();
        assert_eq!(plain.total_items(), 2);

        let null_quiz = parse_content(r#"{"flashcards":[{"f":"a","b":"b"}],"quiz":null}"#).unwrap();
        assert_eq!(null_quiz.flashcards.len(), 1);
        assert!(null_quiz.quiz.is_empty());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_content("<html>").unwrap_err();
        assert!(matches!(err, ContentError::Parse(_)));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let service = ContentService::new();
        let source = ContentSource::File(PathBuf::from("definitely/not/here.json"));
        let err = service.load(&source).await.unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }

    #[tokio::test]
    async fn file_source_loads_content() {
        let path = std::env::temp_dir().join(format!("study-content-{}.json", std::process::id()));
        tokio::fs::write(&path, r#"{"flashcards":[{"f":"a","b":"b"}]}"#)
            .await
            .unwrap();

        let content = ContentService::new()
            .load(&ContentSource::File(path.clone()))
            .await
            .unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(content.flashcards.len(), 1);
    }
}
