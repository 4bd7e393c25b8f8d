pub mod credentials;
pub mod google;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use serde::Serialize;

use crate::cache::AudioCache;
use crate::error::ProviderError;

pub use credentials::{ServiceAccountKey, TokenSource};
pub use google::GoogleTts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    Mp3,
}

/// Everything the provider needs for one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    pub text: String,
    pub locale: String,
    pub voice: String,
    pub encoding: AudioEncoding,
    /// `None` leaves the provider's default rate in place.
    pub speaking_rate: Option<f64>,
}

/// A text-to-speech backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, params: &SynthesisParams) -> Result<Bytes, ProviderError>;
}

pub struct TtsService {
    locale: String,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    cache: Arc<dyn AudioCache>,
}

impl TtsService {
    pub fn new(
        locale: String,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        cache: Arc<dyn AudioCache>,
    ) -> Self {
        Self {
            locale,
            synthesizer,
            cache,
        }
    }

    /// Return MP3 audio for `text`, synthesizing it on a cache miss.
    ///
    /// A hit ignores `voice` and `speed` entirely. Identical misses in flight
    /// at the same time each call the provider.
    pub async fn speak(
        &self,
        text: &str,
        voice: &str,
        speed: Option<f64>,
    ) -> Result<Bytes, ProviderError> {
        // 1. Cached audio wins
        if let Some(audio) = self.cache.get(text) {
            tracing::debug!("Cache hit ({} bytes, text_len={})", audio.len(), text.len());
            return Ok(audio);
        }

        tracing::debug!(
            "Cache miss, synthesizing: locale={}, voice={}, speed={:?}, text_len={}",
            self.locale,
            voice,
            speed,
            text.len()
        );

        // 2. Ask the provider
        let params = SynthesisParams {
            text: text.to_string(),
            locale: self.locale.clone(),
            voice: voice.to_string(),
            encoding: AudioEncoding::Mp3,
            speaking_rate: speed,
        };
        let audio = self.synthesizer.synthesize(&params).await?;

        // 3. Remember it
        self.cache.set(text.to_string(), audio.clone());
        tracing::debug!("Cached {} bytes, {} entries total", audio.len(), self.cache.len());

        Ok(audio)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeSynthesizer;
    use super::*;
    use crate::cache::MemoryCache;

    fn service(fake: &Arc<FakeSynthesizer>) -> (TtsService, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        let service = TtsService::new("cs-CZ".into(), fake.clone(), cache.clone());
        (service, cache)
    }

    #[tokio::test]
    async fn test_miss_calls_provider_once() {
        let fake = Arc::new(FakeSynthesizer::returning(&[1, 2, 3]));
        let (tts, cache) = service(&fake);

        let audio = tts.speak("Hello", "cs-CZ-Wavenet-A", Some(1.0)).await.unwrap();

        assert_eq!(&audio[..], &[1, 2, 3]);
        assert_eq!(fake.calls(), 1);
        assert_eq!(&cache.get("Hello").unwrap()[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn test_hit_skips_provider() {
        let fake = Arc::new(FakeSynthesizer::returning(&[1, 2, 3]));
        let (tts, _) = service(&fake);

        let first = tts.speak("Hello", "cs-CZ-Wavenet-A", Some(1.0)).await.unwrap();
        let second = tts.speak("Hello", "cs-CZ-Wavenet-A", Some(1.0)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_hit_ignores_voice_and_speed() {
        let fake = Arc::new(FakeSynthesizer::returning(&[9, 9]));
        let (tts, _) = service(&fake);

        let a = tts.speak("Ahoj", "voiceA", Some(1.0)).await.unwrap();
        let b = tts.speak("Ahoj", "voiceB", Some(2.0)).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(fake.calls(), 1);
        assert_eq!(fake.seen()[0].voice, "voiceA");
    }

    #[tokio::test]
    async fn test_evicted_entry_resynthesizes_once() {
        let fake = Arc::new(FakeSynthesizer::returning(&[1]));
        let (tts, cache) = service(&fake);

        tts.speak("Hello", "v", None).await.unwrap();
        cache.remove("Hello");
        tts.speak("Hello", "v", None).await.unwrap();
        tts.speak("Hello", "v", None).await.unwrap();

        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_all_reach_provider() {
        let fake = Arc::new(FakeSynthesizer::gated(3));
        let (tts, cache) = service(&fake);

        let (a, b, c) = tokio::join!(
            tts.speak("T", "voiceA", Some(1.0)),
            tts.speak("T", "voiceB", Some(1.5)),
            tts.speak("T", "voiceC", None),
        );
        let results = [a.unwrap(), b.unwrap(), c.unwrap()];

        // No de-duplication: every miss calls the provider
        assert_eq!(fake.calls(), 3);
        let mut numbers: Vec<u8> = results.iter().map(|audio| audio[0]).collect();
        numbers.sort();
        assert_eq!(numbers, vec![1, 2, 3]);

        // One entry survives, holding whichever write landed last
        assert_eq!(cache.len(), 1);
        let cached = cache.get("T").unwrap();
        assert!(results.contains(&cached));

        // Later requests are served from it
        let again = tts.speak("T", "voiceD", Some(2.0)).await.unwrap();
        assert_eq!(again, cached);
        assert_eq!(fake.calls(), 3);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_untouched() {
        let fake = Arc::new(FakeSynthesizer::failing());
        let (tts, cache) = service(&fake);

        let result = tts.speak("Hello", "nope", Some(1.0)).await;

        assert!(matches!(result, Err(ProviderError::Api { status: 400, .. })));
        assert!(cache.is_empty());
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_params() {
        let fake = Arc::new(FakeSynthesizer::returning(&[1]));
        let (tts, _) = service(&fake);

        tts.speak("Dobrý den", "cs-CZ-Standard-A", Some(1.25)).await.unwrap();

        let seen = fake.seen();
        assert_eq!(
            seen,
            vec![SynthesisParams {
                text: "Dobrý den".into(),
                locale: "cs-CZ".into(),
                voice: "cs-CZ-Standard-A".into(),
                encoding: AudioEncoding::Mp3,
                speaking_rate: Some(1.25),
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_text_is_forwarded() {
        let fake = Arc::new(FakeSynthesizer::returning(&[1]));
        let (tts, _) = service(&fake);

        tts.speak("", "", None).await.unwrap();

        assert_eq!(fake.calls(), 1);
        assert_eq!(fake.seen()[0].text, "");
    }
}
