//! Voice dictation on top of a notes session.
//!
//! Recording and transcription are two flags driven by user toggles and by
//! events from the recognizer. Recognizer output arrives on a bounded
//! channel and is applied by whoever owns the session, either with
//! [`VoiceSession::pump`] or [`VoiceSession::next_event`].

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::capability::{
    AudioRecorder, Capabilities, SpeechRecognizer, TranscriptEvent, TranscriptSegment,
};
use crate::error::{Error, Result};
use crate::notes::{NoteStore, NotesSession};

/// Buffered recognizer events before the recognizer has to wait.
const EVENT_BUFFER: usize = 64;

/// What the voice controls look like right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceControls {
    /// Audio capture is running.
    pub recording: bool,
    /// Speech recognition is running.
    pub transcribing: bool,
    /// The record button can be pressed.
    pub record_enabled: bool,
    /// The transcription button can be pressed.
    pub transcribe_enabled: bool,
    /// The input buffer cannot be edited by hand.
    pub input_read_only: bool,
    /// Banner to show when speech is unavailable.
    pub advisory: Option<&'static str>,
}

/// A notes session with recording and live transcription.
pub struct VoiceSession<S> {
    notes: NotesSession<S>,
    capabilities: Capabilities,
    recorder: Box<dyn AudioRecorder>,
    recognizer: Box<dyn SpeechRecognizer>,
    recording: bool,
    transcribing: bool,
    events_tx: mpsc::Sender<TranscriptEvent>,
    events_rx: mpsc::Receiver<TranscriptEvent>,
}

impl<S> std::fmt::Debug for VoiceSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceSession")
            .field("capabilities", &self.capabilities)
            .field("recorder", &self.recorder.name())
            .field("recognizer", &self.recognizer.name())
            .field("recording", &self.recording)
            .field("transcribing", &self.transcribing)
            .finish_non_exhaustive()
    }
}

impl<S: NoteStore> VoiceSession<S> {
    /// Wrap `notes` with the given devices.
    #[must_use]
    pub fn new(
        notes: NotesSession<S>,
        capabilities: Capabilities,
        recorder: Box<dyn AudioRecorder>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        if let Some(advisory) = capabilities.advisory() {
            warn!("{advisory}");
        }
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        Self {
            notes,
            capabilities,
            recorder,
            recognizer,
            recording: false,
            transcribing: false,
            events_tx,
            events_rx,
        }
    }

    /// The wrapped notes session.
    #[must_use]
    pub fn notes(&self) -> &NotesSession<S> {
        &self.notes
    }

    /// Mutable access to the notes, for saving and deleting.
    pub fn notes_mut(&mut self) -> &mut NotesSession<S> {
        &mut self.notes
    }

    /// Capabilities the session was created with.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// A sender for recognizer events, for hosts that deliver them directly.
    #[must_use]
    pub fn event_sender(&self) -> mpsc::Sender<TranscriptEvent> {
        self.events_tx.clone()
    }

    /// Whether audio capture is running.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Whether speech recognition is running.
    #[must_use]
    pub fn is_transcribing(&self) -> bool {
        self.transcribing
    }

    /// Current state of the controls.
    #[must_use]
    pub fn controls(&self) -> VoiceControls {
        let speech = self.capabilities.speech.is_available();
        VoiceControls {
            recording: self.recording,
            transcribing: self.transcribing,
            record_enabled: speech && self.capabilities.audio.is_available(),
            transcribe_enabled: speech && !self.recording,
            input_read_only: self.recording || self.transcribing,
            advisory: self.capabilities.advisory(),
        }
    }

    /// Replace the input buffer by hand.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] while recording or transcribing.
    pub fn set_input(&mut self, text: impl Into<String>) -> Result<()> {
        if self.controls().input_read_only {
            return Err(Error::invalid_state(
                "input cannot be edited while recording or transcribing",
            ));
        }
        self.notes.set_input(text);
        Ok(())
    }

    /// Start or stop recording.
    ///
    /// Starting opens the microphone and then starts transcription. If the
    /// microphone cannot be opened nothing is left running. Stopping halts
    /// both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnavailable`] if speech or audio is
    /// missing, [`Error::PermissionDenied`] if microphone access is refused,
    /// or [`Error::CapabilityStart`] if the recorder fails for another reason.
    pub fn toggle_recording(&mut self) -> Result<()> {
        if self.recording {
            self.stop_recording();
            return Ok(());
        }

        self.require_speech()?;
        if let Some(reason) = self.capabilities.audio.reason() {
            return Err(Error::capability_unavailable("audio", reason));
        }

        if let Err(e) = self.recorder.start() {
            if e.is_permission_error() || e.is_capability_unavailable() {
                warn!(recorder = self.recorder.name(), "Could not access microphone");
                return Err(e);
            }
            warn!(recorder = self.recorder.name(), error = %e, "Recorder failed to start");
            return Err(Error::capability_start("audio", e.to_string()));
        }
        self.recording = true;
        info!(recorder = self.recorder.name(), "Recording started");

        match self.recognizer.start(self.events_tx.clone()) {
            Ok(()) => self.transcribing = true,
            Err(e) => {
                warn!(recognizer = self.recognizer.name(), error = %e, "Transcription did not start");
            }
        }
        Ok(())
    }

    /// Start or stop live transcription on its own.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnavailable`] if speech is missing,
    /// [`Error::InvalidState`] while recording, or the recognizer's error.
    pub fn toggle_transcription(&mut self) -> Result<()> {
        self.require_speech()?;
        if self.recording {
            return Err(Error::invalid_state(
                "transcription is controlled by recording while recording",
            ));
        }

        if self.transcribing {
            self.recognizer.stop()?;
            self.transcribing = false;
            info!(recognizer = self.recognizer.name(), "Transcription stopped");
        } else {
            self.recognizer.start(self.events_tx.clone())?;
            self.transcribing = true;
            info!(recognizer = self.recognizer.name(), "Transcription started");
        }
        Ok(())
    }

    /// Apply one recognizer event.
    pub fn handle_event(&mut self, event: TranscriptEvent) {
        match event {
            TranscriptEvent::Results(segments) => {
                let text = final_text(&segments);
                if !text.is_empty() {
                    self.notes.append_transcript(&text);
                }
            }
            TranscriptEvent::Error(message) => {
                warn!(recognizer = self.recognizer.name(), %message, "Speech recognition error");
                self.transcribing = false;
            }
            TranscriptEvent::Ended => {
                debug!(recognizer = self.recognizer.name(), "Speech recognition ended");
                self.transcribing = false;
            }
        }
    }

    /// Apply every event already queued. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next recognizer event and apply it.
    pub async fn next_event(&mut self) {
        // The session holds a sender, so the channel never closes.
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    fn stop_recording(&mut self) {
        if let Err(e) = self.recorder.stop() {
            warn!(recorder = self.recorder.name(), error = %e, "Recorder failed to stop");
        }
        if self.transcribing {
            if let Err(e) = self.recognizer.stop() {
                warn!(recognizer = self.recognizer.name(), error = %e, "Recognizer failed to stop");
            }
        }
        self.recording = false;
        self.transcribing = false;
        info!("Recording stopped");
    }

    fn require_speech(&self) -> Result<()> {
        match self.capabilities.speech.reason() {
            Some(reason) => Err(Error::capability_unavailable("speech", reason)),
            None => Ok(()),
        }
    }
}

/// Concatenate the final segments of one batch. Interim text is dropped.
fn final_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .filter(|segment| segment.is_final)
        .map(|segment| segment.text.as_str())
        .collect()
}
