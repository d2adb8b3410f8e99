//! Lesson addressing and the lesson catalog.
//!
//! A lesson is identified by `<book>/<lessonfile>`, e.g. `NCE1/001&002`. The
//! audio, transcript and cover locations are all derived from that id.

use crate::error::LrcSyncError;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const BOOKS: [u8; 4] = [1, 2, 3, 4];
const BOOK_PREFIX: &str = "NCE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonAddress {
    id: String,
    book: String,
}

impl LessonAddress {
    /// Accepts a bare id or a page fragment such as `#NCE2/05?autoplay`.
    pub fn parse(fragment: &str) -> Result<Self, LrcSyncError> {
        let id = fragment.trim().trim_start_matches('#');
        let id = id.split('?').next().unwrap_or("");
        match id.split_once('/') {
            Some((book, lesson)) if !book.is_empty() && !lesson.is_empty() => Ok(Self {
                id: id.to_string(),
                book: book.to_string(),
            }),
            _ => Err(LrcSyncError::InvalidLessonId(fragment.to_string())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn audio(&self) -> String {
        format!("{}.mp3", self.id)
    }

    pub fn timed_text(&self) -> String {
        format!("{}.lrc", self.id)
    }

    pub fn cover(&self) -> String {
        format!("images/{}.jpg", self.book)
    }

    pub fn book_page(&self) -> String {
        format!("book.html#{}", self.book)
    }
}

/// Parses `NCE2` or `2`. An empty token selects the first book.
pub fn book_number(token: &str) -> Result<u8, LrcSyncError> {
    let token = token.trim();
    let digits = token.strip_prefix(BOOK_PREFIX).unwrap_or(token);
    if digits.is_empty() {
        return Ok(BOOKS[0]);
    }
    match digits.parse::<u8>() {
        Ok(book) if BOOKS.contains(&book) => Ok(book),
        _ => Err(LrcSyncError::UnknownBook(token.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub(crate) filename: String,
    pub(crate) title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonLink {
    pub(crate) number: usize,
    pub(crate) title: String,
    pub(crate) href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: BTreeMap<String, Vec<CatalogEntry>>,
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse lesson catalog")
    }

    pub fn lessons(&self, book: u8) -> Result<Vec<LessonLink>, LrcSyncError> {
        let entries = self
            .books
            .get(&book.to_string())
            .ok_or_else(|| LrcSyncError::UnknownBook(book.to_string()))?;

        Ok(entries
            .iter()
            .enumerate()
            .map(|(index, entry)| LessonLink {
                number: lesson_number(book, index),
                title: entry.title.clone(),
                href: format!("lesson.html#{}{}/{}", BOOK_PREFIX, book, entry.filename),
            })
            .collect())
    }
}

/// Each file of the first book covers a lesson and its exercise lesson.
fn lesson_number(book: u8, index: usize) -> usize {
    if book == 1 {
        index * 2 + 1
    } else {
        index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "1": [
            {"filename": "001&002", "title": "Excuse me!"},
            {"filename": "003&004", "title": "Sorry, sir."}
        ],
        "2": [
            {"filename": "01", "title": "A private conversation"}
        ]
    }"#;

    #[test]
    fn derives_resource_locations() {
        let address = LessonAddress::parse("NCE1/001&002").unwrap();
        assert_eq!(address.book(), "NCE1");
        assert_eq!(address.audio(), "NCE1/001&002.mp3");
        assert_eq!(address.timed_text(), "NCE1/001&002.lrc");
        assert_eq!(address.cover(), "images/NCE1.jpg");
        assert_eq!(address.book_page(), "book.html#NCE1");
    }

    #[test]
    fn strips_fragment_and_query() {
        let address = LessonAddress::parse("#NCE2/05?autoplay=1").unwrap();
        assert_eq!(address.id(), "NCE2/05");
    }

    #[test]
    fn rejects_incomplete_ids() {
        for id in &["", "#", "NCE1", "NCE1/", "/001"] {
            assert_eq!(
                LessonAddress::parse(id),
                Err(LrcSyncError::InvalidLessonId(id.to_string()))
            );
        }
    }

    #[test]
    fn parses_book_numbers() {
        assert_eq!(book_number("NCE3"), Ok(3));
        assert_eq!(book_number("2"), Ok(2));
        assert_eq!(book_number(""), Ok(1));
        assert_eq!(book_number("NCE"), Ok(1));
        assert!(book_number("NCE5").is_err());
        assert!(book_number("x").is_err());
    }

    #[test]
    fn first_book_numbers_lessons_in_pairs() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let links = catalog.lessons(1).unwrap();
        assert_eq!(
            links,
            vec![
                LessonLink {
                    number: 1,
                    title: "Excuse me!".to_string(),
                    href: "lesson.html#NCE1/001&002".to_string(),
                },
                LessonLink {
                    number: 3,
                    title: "Sorry, sir.".to_string(),
                    href: "lesson.html#NCE1/003&004".to_string(),
                },
            ]
        );
    }

    #[test]
    fn other_books_number_sequentially() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let links = catalog.lessons(2).unwrap();
        assert_eq!(links[0].number, 1);
        assert_eq!(links[0].href, "lesson.html#NCE2/01");
    }

    #[test]
    fn missing_book() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(
            catalog.lessons(4),
            Err(LrcSyncError::UnknownBook("4".to_string()))
        );
    }

    #[test]
    fn invalid_catalog_json() {
        assert!(Catalog::from_json("[1, 2]").is_err());
    }
}
