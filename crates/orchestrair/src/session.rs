//! Per-frame instrument session
//!
//! Consumes feed snapshots, runs the active instrument and forwards the
//! resulting notes to an optional MIDI sink.

use anyhow::Result;
use orchestrair_control::{FeedSnapshot, FeedStatus, MidiMessage, MidiSink, NoteRouter};
use orchestrair_core::{
    AppConfig, DrumKit, Feedback, FrameProcessor, HandFrame, Instrument, KeyTransition,
    NoteHistory, TutorialProgress, TutorialSession,
};
use tracing::{debug, info, warn};

/// Instrument state driven by the tracking feed
pub struct Session<S: MidiSink = Box<dyn MidiSink>> {
    instrument: Instrument,
    processor: FrameProcessor,
    drums: DrumKit,
    history: NoteHistory,
    tutorial: Option<TutorialSession>,
    router: NoteRouter,
    sink: Option<S>,
    status: FeedStatus,
    last_sequence: u64,
}

impl<S: MidiSink> Session<S> {
    /// Build a session from a validated config
    pub fn new(config: &AppConfig, sink: Option<S>) -> Result<Self> {
        let tracking = &config.tracking;
        let processor = FrameProcessor::new(
            tracking.calibration,
            config.key_registry()?,
            tracking.fingertips.clone(),
        );

        Ok(Self {
            instrument: config.backend.instrument,
            processor,
            drums: DrumKit::new(tracking.space.height, tracking.strike_threshold),
            history: NoteHistory::new(),
            tutorial: config
                .tutorial
                .then(TutorialSession::chromatic_octave),
            router: NoteRouter::from_config(&config.midi),
            sink,
            status: FeedStatus::Connecting,
            last_sequence: 0,
        })
    }

    /// Recently played piano notes
    pub fn history(&self) -> &NoteHistory {
        &self.history
    }

    /// The running tutorial, if enabled
    pub fn tutorial(&self) -> Option<&TutorialSession> {
        self.tutorial.as_ref()
    }

    /// The MIDI sink, if one is attached
    #[cfg(test)]
    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// Keys currently held
    pub fn active_keys(&self) -> impl Iterator<Item = &str> {
        self.processor.current().iter()
    }

    /// Handle one feed snapshot
    pub fn handle(&mut self, snapshot: &FeedSnapshot) -> Result<()> {
        if snapshot.status != self.status {
            self.on_status_change(&snapshot.status)?;
        }

        if !snapshot.status.is_connected() || snapshot.sequence == self.last_sequence {
            return Ok(());
        }
        if let Some(skipped) = snapshot.sequence.checked_sub(self.last_sequence + 1) {
            if skipped > 0 {
                debug!("Skipped {} stale frames", skipped);
            }
        }
        self.last_sequence = snapshot.sequence;

        match &snapshot.frame {
            Some(frame) => self.play(frame),
            None => Ok(()),
        }
    }

    /// Release everything still sounding
    pub fn shutdown(&mut self) -> Result<()> {
        let transition = self.processor.reset();
        self.emit(&transition)?;
        if let Some(sink) = self.sink.as_mut() {
            sink.send(&MidiMessage::all_notes_off(self.router.channel()))?;
        }
        Ok(())
    }

    fn on_status_change(&mut self, status: &FeedStatus) -> Result<()> {
        match status {
            FeedStatus::Connected => info!("Tracking connected, playing {}", self.instrument),
            FeedStatus::Connecting => info!("Connecting to tracking feed..."),
            FeedStatus::Disconnected { reason } => warn!("Tracking lost: {}", reason),
            FeedStatus::Closed => warn!("Tracking feed closed"),
        }

        if !status.is_connected() {
            self.drums.reset();
            let transition = self.processor.reset();
            if !transition.is_empty() {
                warn!("Released {} held keys", transition.exited.len());
                self.emit(&transition)?;
            }
        }
        self.status = status.clone();
        Ok(())
    }

    fn play(&mut self, frame: &HandFrame) -> Result<()> {
        match self.instrument {
            Instrument::Piano => {
                let output = self.processor.process(frame);
                if output.hands_skipped > 0 {
                    debug!("Ignored {} malformed hands", output.hands_skipped);
                }
                for note in &output.transition.entered {
                    info!("Key down: {}", note);
                }
                self.history.record(&output.transition);
                self.check_tutorial(&output.transition);
                self.emit(&output.transition)
            }
            Instrument::Drums => {
                for hit in self.drums.process(frame) {
                    info!("{:?} hit ({:.0} px/frame)", hit.pad, hit.velocity);
                    if let Some(sink) = self.sink.as_mut() {
                        sink.send_all(&self.router.drum_messages(&hit))?;
                    }
                }
                Ok(())
            }
        }
    }

    fn check_tutorial(&mut self, transition: &KeyTransition) {
        let Some(tutorial) = self.tutorial.as_mut() else {
            return;
        };
        for note in &transition.entered {
            if tutorial.is_completed() {
                return;
            }
            match tutorial.observe(note) {
                Feedback::Correct => match tutorial.advance() {
                    TutorialProgress::Next(next) => info!("Correct! Next note: {}", next),
                    TutorialProgress::Completed => info!("Tutorial completed"),
                    TutorialProgress::NotReady => {}
                },
                Feedback::Incorrect => {
                    if let Some(required) = tutorial.required() {
                        info!("Played {}, expected {}", note, required);
                    }
                }
            }
        }
    }

    fn emit(&mut self, transition: &KeyTransition) -> Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            self.router.route(sink, transition)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrair_core::{
        Calibration, CoordinateSpace, Hand, HandLandmark, Landmark, LANDMARKS_PER_HAND,
    };
    use std::sync::Arc;

    fn config(instrument: Instrument) -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.instrument = instrument;
        // Identity-like mapping keeps landmark coordinates readable
        config.tracking.calibration = Calibration::stretch_to(CoordinateSpace::default());
        config
    }

    /// Hand resting off the keyboard with the index tip at key-space `(x, y)`
    fn hand_at(x: f32, y: f32) -> Hand {
        let mut landmarks = vec![Landmark::new(0.99, 0.01, 0.0); LANDMARKS_PER_HAND];
        landmarks[HandLandmark::IndexTip.index()] = Landmark::new(x / 640.0, y / 480.0, 0.0);
        Hand::new(landmarks)
    }

    /// Hand on the left half of the frame with the index tip at pixel height `y`
    fn drum_hand(y: f32) -> Hand {
        let mut landmarks = vec![Landmark::new(0.2, 0.5, 0.0); LANDMARKS_PER_HAND];
        landmarks[HandLandmark::IndexTip.index()] = Landmark::new(0.2, y / 480.0, 0.0);
        Hand::new(landmarks)
    }

    fn connected(sequence: u64, hands: Vec<Hand>) -> FeedSnapshot {
        FeedSnapshot {
            sequence,
            status: FeedStatus::Connected,
            frame: Some(Arc::new(HandFrame::new(hands))),
        }
    }

    fn session(instrument: Instrument) -> Session<Vec<MidiMessage>> {
        Session::new(&config(instrument), Some(Vec::new())).unwrap()
    }

    #[test]
    fn test_piano_notes_reach_sink() {
        let mut session = session(Instrument::Piano);
        session.handle(&connected(1, vec![hand_at(262.0, 330.0)])).unwrap();
        session.handle(&connected(2, vec![])).unwrap();

        assert_eq!(
            session.sink().unwrap(),
            &vec![
                MidiMessage::NoteOn {
                    channel: 0,
                    note: 60,
                    velocity: 100
                },
                MidiMessage::NoteOff {
                    channel: 0,
                    note: 60
                },
            ]
        );
        assert_eq!(session.history().latest(), Some("C"));
    }

    #[test]
    fn test_repeated_snapshot_is_ignored() {
        let mut session = session(Instrument::Piano);
        let snapshot = connected(1, vec![hand_at(262.0, 330.0)]);
        session.handle(&snapshot).unwrap();
        session.handle(&snapshot).unwrap();
        assert_eq!(session.sink().unwrap().len(), 1);
    }

    #[test]
    fn test_disconnect_releases_keys() {
        let mut session = session(Instrument::Piano);
        session.handle(&connected(1, vec![hand_at(262.0, 330.0)])).unwrap();
        session
            .handle(&FeedSnapshot {
                sequence: 1,
                status: FeedStatus::Disconnected {
                    reason: "timeout".to_string(),
                },
                frame: None,
            })
            .unwrap();

        assert_eq!(session.active_keys().count(), 0);
        assert_eq!(
            session.sink().unwrap().last(),
            Some(&MidiMessage::NoteOff {
                channel: 0,
                note: 60
            })
        );
    }

    #[test]
    fn test_drum_hits() {
        let mut session = session(Instrument::Drums);
        session.handle(&connected(1, vec![drum_hand(100.0)])).unwrap();
        session.handle(&connected(2, vec![drum_hand(200.0)])).unwrap();

        let sink = session.sink().unwrap();
        assert_eq!(sink.len(), 2);
        assert!(matches!(sink[0], MidiMessage::NoteOn { note: 38, .. }));
        // Pads are not notes
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_drum_state_dropped_on_disconnect() {
        let mut session = session(Instrument::Drums);
        session.handle(&connected(1, vec![drum_hand(100.0)])).unwrap();
        session
            .handle(&FeedSnapshot {
                sequence: 1,
                status: FeedStatus::Disconnected {
                    reason: "timeout".to_string(),
                },
                frame: None,
            })
            .unwrap();
        session.handle(&connected(2, vec![drum_hand(300.0)])).unwrap();

        assert!(session.sink().unwrap().is_empty());

        // Tracking continues normally after the reconnect
        session.handle(&connected(3, vec![drum_hand(400.0)])).unwrap();
        assert!(matches!(
            session.sink().unwrap()[0],
            MidiMessage::NoteOn { note: 38, .. }
        ));
    }

    #[test]
    fn test_tutorial_follows_entered_keys() {
        let mut config = config(Instrument::Piano);
        config.tutorial = true;
        let mut session: Session<Vec<MidiMessage>> = Session::new(&config, None).unwrap();

        // Wrong key first, then the required C
        session.handle(&connected(1, vec![hand_at(290.0, 330.0)])).unwrap();
        assert_eq!(session.tutorial().unwrap().step(), 0);
        session.handle(&connected(2, vec![])).unwrap();
        session.handle(&connected(3, vec![hand_at(262.0, 330.0)])).unwrap();

        let tutorial = session.tutorial().unwrap();
        assert_eq!(tutorial.step(), 1);
        assert_eq!(tutorial.required(), Some("C#"));
    }

    #[test]
    fn test_tutorial_disabled_by_default() {
        assert!(session(Instrument::Piano).tutorial().is_none());
    }

    #[test]
    fn test_shutdown_silences_channel() {
        let mut session = session(Instrument::Piano);
        session.handle(&connected(1, vec![hand_at(262.0, 330.0)])).unwrap();
        session.shutdown().unwrap();

        let sink = session.sink().unwrap();
        assert_eq!(sink.len(), 3);
        assert_eq!(sink[2], MidiMessage::all_notes_off(0));
    }
}
