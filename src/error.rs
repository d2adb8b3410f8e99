use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum LrcSyncError {
    NoSuchSentence { index: usize, len: usize },
    InvalidLessonId(String),
    UnknownBook(String),
    InvalidTick(f64),
}

impl Error for LrcSyncError {}

impl fmt::Display for LrcSyncError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LrcSyncError::NoSuchSentence { index, len } => write!(
                fmt,
                "Sentence {} does not exist (the transcript has {} sentences)",
                index, len
            ),
            LrcSyncError::InvalidLessonId(id) => write!(fmt, "Invalid lesson id: '{}'", id),
            LrcSyncError::UnknownBook(book) => write!(fmt, "Unknown book: '{}'", book),
            LrcSyncError::InvalidTick(tick) => {
                write!(fmt, "Sample interval {} is too small to advance playback", tick)
            }
        }
    }
}
