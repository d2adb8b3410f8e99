use crate::parser::Transcript;
use crate::timeline::{Metadata, Sentence, Timeline};

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

pub fn serialise<W: Write>(timeline: &Timeline, dst: W) -> Result<()> {
    let mut writer = BufWriter::new(dst);
    write_timeline(&mut writer, timeline).context("Failed to write listing.")?;
    writer.flush().context("Failed to write listing.")?;
    Ok(())
}

pub fn serialise_json<W: Write>(transcript: &Transcript, dst: W) -> Result<()> {
    let mut writer = BufWriter::new(dst);
    serde_json::to_writer_pretty(&mut writer, transcript).context("Failed to write JSON.")?;
    writeln!(writer)?;
    writer.flush().context("Failed to write JSON.")?;
    Ok(())
}

fn write_timeline<W: Write>(buf: &mut W, timeline: &Timeline) -> Result<()> {
    write_metadata(buf, &timeline.metadata)?;
    for (index, sentence) in timeline.sentences.iter().enumerate() {
        write_sentence(buf, index, sentence)?;
    }
    Ok(())
}

fn write_metadata<W: Write>(buf: &mut W, metadata: &Metadata) -> Result<()> {
    let fields = [
        ("Album", &metadata.album),
        ("Artist", &metadata.artist),
        ("Title", &metadata.title),
        ("By", &metadata.by),
    ];
    let mut any = false;
    for (label, value) in fields.iter() {
        if !value.is_empty() {
            writeln!(buf, "{}: {}", label, value)?;
            any = true;
        }
    }
    if any {
        writeln!(buf)?;
    }
    Ok(())
}

fn write_sentence<W: Write>(buf: &mut W, index: usize, sentence: &Sentence) -> Result<()> {
    write!(buf, "{:>3} ", index)?;
    write_ts(buf, sentence.start)?;
    write!(buf, " --> ")?;
    match sentence.end {
        Some(end) => write_ts(buf, end)?,
        None => write!(buf, "{:>8}", "...")?,
    }
    writeln!(buf, "  {}", sentence.primary_text)?;
    if !sentence.secondary_text.is_empty() {
        writeln!(buf, "{:>27}{}", "", sentence.secondary_text)?;
    }
    Ok(())
}

fn write_ts<W: Write>(buf: &mut W, seconds: f64) -> Result<()> {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total_centis = (seconds.abs() * 100.0).round() as u64;
    let minutes = total_centis / 6000;
    let secs = (total_centis % 6000) / 100;
    let centis = total_centis % 100;
    write!(buf, "{}{:02}:{:02}.{:02}", sign, minutes, secs, centis)?;
    Ok(())
}
