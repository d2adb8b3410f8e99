use serde::Serialize;

/// Subtracted from every cue timestamp so a sentence becomes current
/// slightly before it is spoken.
pub const LEAD_IN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTag {
    Album,
    Artist,
    Title,
    By,
}

impl MetadataTag {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "al" => Some(MetadataTag::Album),
            "ar" => Some(MetadataTag::Artist),
            "ti" => Some(MetadataTag::Title),
            "by" => Some(MetadataTag::By),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    pub(crate) album: String,
    pub(crate) artist: String,
    pub(crate) title: String,
    pub(crate) by: String,
}

impl Metadata {
    pub(crate) fn set(&mut self, tag: MetadataTag, value: &str) {
        let field = match tag {
            MetadataTag::Album => &mut self.album,
            MetadataTag::Artist => &mut self.artist,
            MetadataTag::Title => &mut self.title,
            MetadataTag::By => &mut self.by,
        };
        *field = value.to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentence {
    pub(crate) primary_text: String,
    pub(crate) secondary_text: String,
    pub(crate) start: f64,
    /// `None` for the last sentence, which runs until the audio ends.
    pub(crate) end: Option<f64>,
}

impl Sentence {
    /// The start instant itself is excluded; the end is exclusive as well.
    pub fn contains(&self, time: f64) -> bool {
        self.start < time && self.end.map_or(true, |end| time < end)
    }
}

/// Parsed transcript. Built once per lesson and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub(crate) metadata: Metadata,
    pub(crate) sentences: Vec<Sentence>,
}

impl Timeline {
    pub fn new(metadata: Metadata, sentences: Vec<Sentence>) -> Self {
        Self {
            metadata,
            sentences,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn last_start(&self) -> Option<f64> {
        self.sentences.last().map(|s| s.start)
    }
}
