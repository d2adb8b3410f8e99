use crate::error::LrcSyncError;
use crate::sync::{Highlighter, Synchronizer, Transport};

use tracing::debug;

/// A transport without audio: the position only moves when `advance` is called.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedTransport {
    position: f64,
    length: f64,
    playing: bool,
}

impl SimulatedTransport {
    pub fn new(length: f64) -> Self {
        Self {
            position: 0.0,
            length: length.max(0.0),
            playing: false,
        }
    }

    /// Swaps in a new track of `length` seconds, stopped at its start.
    pub fn load_track(&mut self, length: f64) {
        *self = Self::new(length);
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Moves the position forward by `step` seconds while playing. Playback
    /// stops by itself at the end of the track.
    pub fn advance(&mut self, step: f64) -> f64 {
        if self.playing {
            self.position += step;
            if self.position >= self.length {
                self.position = self.length;
                self.playing = false;
            }
        }
        self.position
    }
}

impl Transport for SimulatedTransport {
    fn seek(&mut self, position: f64) {
        self.position = position.max(0.0).min(self.length);
    }

    fn play(&mut self) {
        self.playing = self.position < self.length;
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}

/// Plays sentence `index` and feeds the synchronizer a sample every `tick`
/// seconds until playback stops. Returns the position playback stopped at.
pub fn replay_sentence<H: Highlighter>(
    sync: &mut Synchronizer<SimulatedTransport, H>,
    index: usize,
    tick: f64,
) -> Result<f64, LrcSyncError> {
    if !(tick > 0.0) {
        return Err(LrcSyncError::InvalidTick(tick));
    }
    sync.play_sentence(index)?;
    let mut samples = 0usize;
    while sync.transport().is_playing() {
        let before = sync.transport().position();
        let position = sync.transport_mut().advance(tick);
        if position == before && sync.transport().is_playing() {
            // tick is below the float resolution at this position
            sync.transport_mut().pause();
            return Err(LrcSyncError::InvalidTick(tick));
        }
        sync.on_time_sample(position);
        samples += 1;
    }
    let position = sync.transport().position();
    debug!(index, samples, position, active = ?sync.state().active_index, "Replay finished");
    Ok(position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::sync::HighlightChange;

    #[test]
    fn does_not_move_while_paused() {
        let mut transport = SimulatedTransport::new(10.0);
        assert_eq!(transport.advance(1.0), 0.0);
        assert!(!transport.is_playing());
    }

    #[test]
    fn advances_while_playing() {
        let mut transport = SimulatedTransport::new(10.0);
        transport.seek(2.0);
        transport.play();
        assert_eq!(transport.advance(0.5), 2.5);
        assert_eq!(transport.advance(0.5), 3.0);
        transport.pause();
        assert_eq!(transport.advance(0.5), 3.0);
    }

    #[test]
    fn stops_at_end_of_track() {
        let mut transport = SimulatedTransport::new(1.0);
        transport.play();
        assert_eq!(transport.advance(0.75), 0.75);
        assert_eq!(transport.advance(0.75), 1.0);
        assert!(!transport.is_playing());
    }

    #[test]
    fn seek_is_clamped_to_track() {
        let mut transport = SimulatedTransport::new(5.0);
        transport.seek(-0.5);
        assert_eq!(transport.position(), 0.0);
        transport.seek(9.0);
        assert_eq!(transport.position(), 5.0);
        transport.play();
        assert!(!transport.is_playing());
    }

    #[test]
    fn load_track_rewinds_and_stops() {
        let mut transport = SimulatedTransport::new(3.0);
        transport.play();
        transport.advance(2.0);
        transport.load_track(8.0);
        assert_eq!(transport.position(), 0.0);
        assert!(!transport.is_playing());
        transport.seek(7.0);
        assert_eq!(transport.position(), 7.0);
    }

    #[test]
    fn replay_stops_at_sentence_end() {
        let transcript = Parser::new()
            .unwrap()
            .parse("[00:01.50]One|一\n[00:04.50]Two|二\n[00:08.50]Three|三");
        let mut sync = Synchronizer::new(
            transcript.timeline,
            SimulatedTransport::new(12.0),
            Vec::<HighlightChange>::new(),
        );

        let stopped_at = replay_sentence(&mut sync, 1, 0.25).unwrap();

        assert_eq!(stopped_at, 8.0);
        assert!(!sync.transport().is_playing());
        assert_eq!(
            sync.highlighter(),
            &vec![HighlightChange {
                previous: None,
                current: 1
            }]
        );
        assert_eq!(sync.state().active_index, None);
    }

    #[test]
    fn replay_of_last_sentence_runs_to_end_of_track() {
        let transcript = Parser::new()
            .unwrap()
            .parse("[00:01.50]One\n[00:04.50]Two");
        let mut sync = Synchronizer::new(
            transcript.timeline,
            SimulatedTransport::new(6.0),
            Vec::<HighlightChange>::new(),
        );

        assert_eq!(replay_sentence(&mut sync, 1, 0.5).unwrap(), 6.0);
        assert_eq!(sync.state().active_index, Some(1));
    }

    #[test]
    fn replay_of_missing_sentence_fails() {
        let mut sync = Synchronizer::new(
            Default::default(),
            SimulatedTransport::new(6.0),
            Vec::<HighlightChange>::new(),
        );
        assert!(replay_sentence(&mut sync, 0, 0.5).is_err());
        assert_eq!(sync.transport().position(), 0.0);
    }

    #[test]
    fn replay_rejects_non_positive_tick() {
        let transcript = Parser::new().unwrap().parse("[00:01.50]One");
        let mut sync = Synchronizer::new(
            transcript.timeline,
            SimulatedTransport::new(6.0),
            Vec::<HighlightChange>::new(),
        );
        assert_eq!(
            replay_sentence(&mut sync, 0, 0.0),
            Err(LrcSyncError::InvalidTick(0.0))
        );
        assert!(!sync.transport().is_playing());
    }

    #[test]
    fn replay_rejects_tick_that_cannot_move_position() {
        let transcript = Parser::new()
            .unwrap()
            .parse("[00:10.50]One\n[00:14.50]Two");
        let mut sync = Synchronizer::new(
            transcript.timeline,
            SimulatedTransport::new(20.0),
            Vec::<HighlightChange>::new(),
        );
        assert_eq!(
            replay_sentence(&mut sync, 0, 1e-300),
            Err(LrcSyncError::InvalidTick(1e-300))
        );
        assert!(!sync.transport().is_playing());
        assert_eq!(sync.transport().position(), 10.0);
    }
}
