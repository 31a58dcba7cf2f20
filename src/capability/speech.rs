//! Text-to-speech announcements

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Capabilities, CapabilityError, Capability};

/// A voice offered by the synthesizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag, e.g. `tr-TR`
    pub lang: String,
}

/// Caller overrides for an announcement; unset fields use Turkish defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeechOptions {
    pub lang: Option<String>,
    pub rate: Option<f32>,
    pub volume: Option<f32>,
    pub pitch: Option<f32>,
}

/// A fully resolved announcement handed to the synthesizer
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub volume: f32,
    pub pitch: f32,
    pub voice: Option<Voice>,
}

impl Utterance {
    pub fn new(text: impl Into<String>, options: &SpeechOptions) -> Self {
        Self {
            text: text.into(),
            lang: options.lang.clone().unwrap_or_else(|| "tr-TR".to_string()),
            rate: options.rate.unwrap_or(1.0),
            volume: options.volume.unwrap_or(0.8),
            pitch: options.pitch.unwrap_or(1.0),
            voice: None,
        }
    }
}

/// Platform speech synthesis
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Stops anything currently being spoken
    fn cancel(&self);

    fn voices(&self) -> Vec<Voice>;

    /// Speaks the utterance, resolving once it has finished
    async fn speak(&self, utterance: Utterance) -> Result<(), CapabilityError>;
}

impl Capabilities {
    /// Announces `text`, interrupting any announcement in progress.
    ///
    /// A Turkish voice is preferred when the platform has one. Fails with
    /// [`CapabilityError::NotSupported`] if speech is unavailable.
    pub async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<(), CapabilityError> {
        let Capability::Available(synth) = &self.speech else {
            return Err(CapabilityError::NotSupported("Speech synthesis"));
        };

        synth.cancel();

        let mut utterance = Utterance::new(text, options);
        utterance.voice = synth.voices().into_iter().find(|v| v.lang.starts_with("tr"));

        synth.speak(utterance).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::HostEnvironment;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSynth {
        voices: Vec<Voice>,
        cancels: Mutex<u32>,
        spoken: Mutex<Vec<Utterance>>,
        fail: bool,
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynth {
        fn cancel(&self) {
            *self.cancels.lock().unwrap() += 1;
        }

        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        async fn speak(&self, utterance: Utterance) -> Result<(), CapabilityError> {
            if self.fail {
                return Err(CapabilityError::Platform("audio device busy".to_string()));
            }
            self.spoken.lock().unwrap().push(utterance);
            Ok(())
        }
    }

    fn with_synth(synth: Arc<RecordingSynth>) -> Capabilities {
        Capabilities {
            speech: Capability::Available(synth),
            ..Capabilities::headless(HostEnvironment::default())
        }
    }

    #[tokio::test]
    async fn test_speak_without_speech_is_rejected() {
        let caps = Capabilities::headless(HostEnvironment::default());

        let err = caps.speak("Radar", &SpeechOptions::default()).await.unwrap_err();

        assert!(matches!(err, CapabilityError::NotSupported(_)));
    }

    #[tokio::test]
    async fn test_speak_applies_defaults_and_cancels_first() {
        let synth = Arc::new(RecordingSynth::default());
        let caps = with_synth(synth.clone());

        caps.speak("500 metre sonra radar", &SpeechOptions::default())
            .await
            .expect("Speech should succeed");

        assert_eq!(*synth.cancels.lock().unwrap(), 1);
        let spoken = synth.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "500 metre sonra radar");
        assert_eq!(spoken[0].lang, "tr-TR");
        assert_eq!(spoken[0].rate, 1.0);
        assert_eq!(spoken[0].volume, 0.8);
        assert_eq!(spoken[0].pitch, 1.0);
        assert!(spoken[0].voice.is_none());
    }

    #[tokio::test]
    async fn test_speak_prefers_turkish_voice() {
        let synth = Arc::new(RecordingSynth {
            voices: vec![
                Voice {
                    name: "Samantha".to_string(),
                    lang: "en-US".to_string(),
                },
                Voice {
                    name: "Yelda".to_string(),
                    lang: "tr-TR".to_string(),
                },
            ],
            ..RecordingSynth::default()
        });
        let caps = with_synth(synth.clone());
        let options = SpeechOptions {
            rate: Some(1.3),
            ..SpeechOptions::default()
        };

        caps.speak("Dikkat", &options).await.unwrap();

        let spoken = synth.spoken.lock().unwrap();
        assert_eq!(spoken[0].voice.as_ref().map(|v| v.name.as_str()), Some("Yelda"));
        assert_eq!(spoken[0].rate, 1.3);
    }

    #[tokio::test]
    async fn test_speak_propagates_platform_error() {
        let synth = Arc::new(RecordingSynth {
            fail: true,
            ..RecordingSynth::default()
        });
        let caps = with_synth(synth);

        let err = caps.speak("Dikkat", &SpeechOptions::default()).await.unwrap_err();

        assert!(err.to_string().contains("busy"));
    }
}
