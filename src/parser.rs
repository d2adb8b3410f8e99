use crate::timeline::{Metadata, MetadataTag, Sentence, Timeline, LEAD_IN};

use anyhow::{Context, Result};
use nom::bytes::complete::tag;
use nom::character::complete::digit1;
use nom::combinator::{map, map_res, opt, recognize};
use nom::error::VerboseError;
use nom::sequence::{delimited, separated_pair, tuple};
use nom::IResult;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// Neither a cue nor a metadata tag. The line was dropped.
    Unrecognised,
    /// The cue's timestamp is earlier than the cue before it.
    OutOfOrder,
}

/// A non-fatal remark about the input. Diagnostics never change the parsed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub(crate) line: usize,
    pub(crate) kind: DiagnosticKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    pub(crate) timeline: Timeline,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

struct Cue<'a> {
    at: f64,
    text: &'a str,
}

pub struct Parser {
    metadata_tag: Regex,
}

impl Parser {
    pub fn new() -> Result<Self> {
        let metadata_tag =
            Regex::new(r"^\[(al|ar|ti|by):(.*)\]").context("Invalid metadata pattern.")?;
        Ok(Self { metadata_tag })
    }

    /// Parsing is lenient: it never fails, lines it does not understand are
    /// skipped and reported through `Transcript::diagnostics`.
    pub fn parse(&self, input: &str) -> Transcript {
        let input = match optional_bom(input) {
            Ok((rest, _)) => rest,
            Err(_) => input,
        };

        let mut metadata = Metadata::default();
        let mut cues: Vec<Cue> = Vec::new();
        let mut diagnostics = Vec::new();

        for (idx, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;

            match cue_line(line) {
                Ok((text, at)) => {
                    if cues.last().map_or(false, |prev| at < prev.at) {
                        warn!(line = line_no, "Cue timestamp is earlier than the previous cue");
                        diagnostics.push(Diagnostic {
                            line: line_no,
                            kind: DiagnosticKind::OutOfOrder,
                        });
                    }
                    cues.push(Cue { at, text });
                }
                Err(_) => {
                    if !self.apply_metadata(line, &mut metadata) {
                        debug!(line = line_no, content = line, "Skipping unrecognised line");
                        diagnostics.push(Diagnostic {
                            line: line_no,
                            kind: DiagnosticKind::Unrecognised,
                        });
                    }
                }
            }
        }

        let sentences: Vec<Sentence> = cues
            .iter()
            .enumerate()
            .map(|(i, cue)| {
                let (primary_text, secondary_text) = split_text(cue.text);
                Sentence {
                    primary_text,
                    secondary_text,
                    start: with_lead_in(cue.at),
                    end: cues.get(i + 1).map(|next| with_lead_in(next.at)),
                }
            })
            .collect();

        debug!(
            sentences = sentences.len(),
            diagnostics = diagnostics.len(),
            "Parsed transcript"
        );

        Transcript {
            timeline: Timeline::new(metadata, sentences),
            diagnostics,
        }
    }

    fn apply_metadata(&self, line: &str, metadata: &mut Metadata) -> bool {
        let caps = match self.metadata_tag.captures(line) {
            Some(caps) => caps,
            None => return false,
        };
        match MetadataTag::from_key(&caps[1]) {
            Some(tag) => {
                metadata.set(tag, &caps[2]);
                true
            }
            None => false,
        }
    }
}

fn with_lead_in(at: f64) -> f64 {
    at - LEAD_IN
}

fn split_text(text: &str) -> (String, String) {
    let mut parts = text.split('|').map(str::trim);
    let primary = parts.next().unwrap_or("").to_string();
    let secondary = parts.next().unwrap_or("").to_string();
    (primary, secondary)
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

/// Matches the leading `[mm:ss.ff]` tag of a cue line. The remaining input is the cue's text.
fn cue_line(input: &str) -> IResult<&str, f64, VerboseError<&str>> {
    delimited(tag("["), timestamp, tag("]"))(input)
}

/// Raw timestamp in seconds, before the lead-in is applied.
fn timestamp(input: &str) -> IResult<&str, f64, VerboseError<&str>> {
    map(separated_pair(minutes, tag(":"), seconds), |(m, s): (u64, f64)| {
        m as f64 * 60.0 + s
    })(input)
}

fn minutes(input: &str) -> IResult<&str, u64, VerboseError<&str>> {
    map_res(digit1, |s: &str| s.parse())(input)
}

/// The fractional part is mandatory.
fn seconds(input: &str) -> IResult<&str, f64, VerboseError<&str>> {
    map_res(recognize(tuple((digit1, tag("."), digit1))), |s: &str| {
        s.parse()
    })(input)
}
