use crate::error::LrcSyncError;
use crate::timeline::Timeline;

use tracing::{debug, trace};

/// Audio playback, as seen by the synchronizer.
pub trait Transport {
    fn seek(&mut self, position: f64);
    fn play(&mut self);
    fn pause(&mut self);
}

/// Receives highlight changes. `previous` should be deactivated before `current` is shown.
pub trait Highlighter {
    fn highlight(&mut self, change: HighlightChange);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightChange {
    pub previous: Option<usize>,
    pub current: usize,
}

impl Highlighter for Vec<HighlightChange> {
    fn highlight(&mut self, change: HighlightChange) {
        self.push(change);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SyncState {
    pub(crate) active_index: Option<usize>,
    /// Playback is paused once it reaches this position.
    pub(crate) segment_end: Option<f64>,
}

pub struct Synchronizer<T, H> {
    timeline: Timeline,
    state: SyncState,
    /// What the highlighter currently shows. Unlike `state.active_index`,
    /// this survives segment playback and bound clears.
    highlighted: Option<usize>,
    transport: T,
    highlighter: H,
}

impl<T: Transport, H: Highlighter> Synchronizer<T, H> {
    pub fn new(timeline: Timeline, transport: T, highlighter: H) -> Self {
        Self {
            timeline,
            state: SyncState::default(),
            highlighted: None,
            transport,
            highlighter,
        }
    }

    /// Switches to another lesson. The previous timeline and state are dropped.
    pub fn load(&mut self, timeline: Timeline) {
        debug!(sentences = timeline.len(), "Loading timeline");
        self.timeline = timeline;
        self.state = SyncState::default();
        self.highlighted = None;
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Finds the first sentence containing `time` and highlights it if it
    /// is not already the active one. When no sentence matches, the active
    /// index is left as it is.
    pub fn resolve_active(&mut self, time: f64) -> Option<usize> {
        let found = self
            .timeline
            .sentences
            .iter()
            .position(|s| s.contains(time));

        if let Some(index) = found {
            if self.state.active_index != Some(index) {
                let change = HighlightChange {
                    previous: self.highlighted,
                    current: index,
                };
                debug!(previous = ?change.previous, current = index, time, "Active sentence changed");
                self.state.active_index = Some(index);
                self.highlighted = Some(index);
                self.highlighter.highlight(change);
            }
        }
        found
    }

    /// Seeks to `start` and plays until `end`. An `end` of `None` plays to the end of the audio.
    pub fn play_segment(&mut self, start: f64, end: Option<f64>) {
        debug!(start, end = ?end, "Playing segment");
        self.state.segment_end = end;
        self.transport.seek(start);
        self.transport.play();
        self.state.active_index = None;
    }

    pub fn play_sentence(&mut self, index: usize) -> Result<(), LrcSyncError> {
        let (start, end) = match self.timeline.get(index) {
            Some(sentence) => (sentence.start, sentence.end),
            None => {
                return Err(LrcSyncError::NoSuchSentence {
                    index,
                    len: self.timeline.len(),
                })
            }
        };
        self.play_segment(start, end);
        Ok(())
    }

    /// Handles a position update from the transport and returns the active sentence afterwards.
    pub fn on_time_sample(&mut self, time: f64) -> Option<usize> {
        trace!(time, "Time sample");
        if let Some(bound) = self.state.segment_end {
            if time >= bound {
                debug!(bound, time, "Segment bound reached");
                self.transport.pause();
                self.transport.seek(bound);
                self.state.segment_end = None;
                self.state.active_index = None;
                return None;
            }
        }
        self.resolve_active(time);
        self.state.active_index
    }
}
