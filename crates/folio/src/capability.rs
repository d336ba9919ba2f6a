//! Host capabilities for voice input.
//!
//! Speech recognition and audio capture are provided by the host. Which of
//! them exist is decided once at startup and injected into the voice
//! session; the session never probes the environment itself.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::CapabilitiesConfig;
use crate::error::{Error, Result};

/// Banner shown when speech recognition is missing.
pub const SPEECH_ADVISORY: &str =
    "Speech recognition is not supported in this environment. Voice controls are disabled.";

/// Whether a host capability can be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Capability {
    /// The capability can be started.
    Available,
    /// The capability is missing.
    Unavailable {
        /// Human-readable explanation.
        reason: String,
    },
}

impl Capability {
    /// Shorthand for an unavailable capability.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Whether the capability can be used.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// The reason the capability is missing, if it is.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Available => None,
            Self::Unavailable { reason } => Some(reason),
        }
    }

    fn from_flag(enabled: bool, missing: &str) -> Self {
        if enabled {
            Self::Available
        } else {
            Self::unavailable(missing)
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable { reason } => write!(f, "unavailable ({reason})"),
        }
    }
}

/// The set of capabilities detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Speech-to-text.
    pub speech: Capability,
    /// Microphone capture.
    pub audio: Capability,
}

impl Capabilities {
    /// Read the capability flags from configuration.
    #[must_use]
    pub fn from_config(config: &CapabilitiesConfig) -> Self {
        Self {
            speech: Capability::from_flag(config.speech, "no speech recognizer configured"),
            audio: Capability::from_flag(config.audio, "no audio input configured"),
        }
    }

    /// Everything available.
    #[must_use]
    pub fn all() -> Self {
        Self {
            speech: Capability::Available,
            audio: Capability::Available,
        }
    }

    /// Banner text to show, if any.
    #[must_use]
    pub fn advisory(&self) -> Option<&'static str> {
        if self.speech.is_available() {
            None
        } else {
            Some(SPEECH_ADVISORY)
        }
    }
}

/// One recognized piece of speech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    /// Recognized text.
    pub text: String,
    /// Final segments are stable; interim ones may still change.
    pub is_final: bool,
}

impl TranscriptSegment {
    /// A final segment.
    #[must_use]
    pub fn final_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: true,
        }
    }

    /// An interim segment.
    #[must_use]
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

/// What a recognizer reports back to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// A batch of segments delivered together.
    Results(Vec<TranscriptSegment>),
    /// The recognizer failed; it has stopped.
    Error(String),
    /// The recognizer stopped on its own.
    Ended,
}

/// A speech-to-text engine.
///
/// Implementations push [`TranscriptEvent`]s into the channel given to
/// [`start`](Self::start) until stopped.
pub trait SpeechRecognizer: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Start recognizing and deliver events to `sender`.
    ///
    /// # Errors
    ///
    /// Returns an error if the recognizer cannot start.
    fn start(&mut self, sender: mpsc::Sender<TranscriptEvent>) -> Result<()>;

    /// Stop recognizing.
    ///
    /// # Errors
    ///
    /// Returns an error if the recognizer fails to stop cleanly.
    fn stop(&mut self) -> Result<()>;

    /// Whether the recognizer is running.
    fn is_running(&self) -> bool;
}

/// A microphone capture device. Captured audio is not processed.
pub trait AudioRecorder: Send {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Open the microphone and start capturing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] if the user refuses access, or
    /// another error if the device cannot start.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing and release the microphone.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails to stop cleanly.
    fn stop(&mut self) -> Result<()>;

    /// Whether the device is capturing.
    fn is_recording(&self) -> bool;
}

/// Stand-in recognizer for hosts without speech support.
#[derive(Debug, Clone)]
pub struct UnavailableRecognizer {
    reason: String,
}

impl UnavailableRecognizer {
    /// Create a recognizer that always refuses to start.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SpeechRecognizer for UnavailableRecognizer {
    fn name(&self) -> &'static str {
        "unavailable-speech"
    }

    fn start(&mut self, _sender: mpsc::Sender<TranscriptEvent>) -> Result<()> {
        Err(Error::capability_unavailable("speech", &self.reason))
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_running(&self) -> bool {
        false
    }
}

/// Stand-in recorder for hosts without a microphone.
#[derive(Debug, Clone)]
pub struct UnavailableRecorder {
    reason: String,
}

impl UnavailableRecorder {
    /// Create a recorder that always refuses to start.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AudioRecorder for UnavailableRecorder {
    fn name(&self) -> &'static str {
        "unavailable-audio"
    }

    fn start(&mut self) -> Result<()> {
        Err(Error::capability_unavailable("audio", &self.reason))
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_recording(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_display() {
        assert_eq!(Capability::Available.to_string(), "available");
        assert_eq!(
            Capability::unavailable("no mic").to_string(),
            "unavailable (no mic)"
        );
    }

    #[test]
    fn test_from_config_defaults_are_unavailable() {
        let caps = Capabilities::from_config(&CapabilitiesConfig::default());
        assert!(!caps.speech.is_available());
        assert!(!caps.audio.is_available());
        assert_eq!(caps.advisory(), Some(SPEECH_ADVISORY));
    }

    #[test]
    fn test_from_config_enabled() {
        let config = CapabilitiesConfig {
            speech: true,
            audio: true,
        };
        let caps = Capabilities::from_config(&config);
        assert_eq!(caps, Capabilities::all());
        assert!(caps.advisory().is_none());
        assert!(caps.speech.reason().is_none());
    }

    #[test]
    fn test_capability_serializes_with_state_tag() {
        let json = serde_json::to_string(&Capability::unavailable("x")).unwrap();
        assert_eq!(json, r#"{"state":"unavailable","reason":"x"}"#);
    }

    #[test]
    fn test_unavailable_providers_refuse_to_start() {
        let (tx, _rx) = mpsc::channel(1);
        let mut recognizer = UnavailableRecognizer::new("none");
        let err = recognizer.start(tx).unwrap_err();
        assert!(err.is_capability_unavailable());
        assert!(!recognizer.is_running());

        let mut recorder = UnavailableRecorder::new("none");
        assert!(recorder.start().unwrap_err().is_capability_unavailable());
        assert!(!recorder.is_recording());
        assert!(recorder.stop().is_ok());
    }
}
