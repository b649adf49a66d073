//! Client for the Quran content API (alquran.cloud compatible).
//!
//! Responses are wrapped as `{ "code": 200, "status": "OK", "data": ... }`.
//! Successful `data` payloads are cached by request path.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::cache::{CacheConfig, CacheStats, TypedCache};
use crate::config::Config;

pub const SURAH_COUNT: u32 = 114;
pub const PAGE_COUNT: u32 = 604;

/// Edition used for ayah and surah text.
const TEXT_EDITION: &str = "quran-uthmani";
/// Edition used for tafsir (Al-Muyassar).
const TAFSIR_EDITION: &str = "ar.muyassar";

#[derive(Debug, Error)]
pub enum QuranError {
    #[error("surah must be between 1 and 114, got {0}")]
    InvalidSurah(u32),

    #[error("page must be between 1 and 604, got {0}")]
    InvalidPage(u32),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {code}: {status}")]
    Upstream { code: u16, status: String },

    #[error("unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("no audio for {0}")]
    MissingAudio(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    code: u16,
    status: String,
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurahRef {
    pub number: u32,
    pub name: String,
    pub english_name: String,
}

/// A single ayah.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ayah {
    pub text: String,
    pub number_in_surah: u32,
    pub surah: SurahRef,
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurahAyah {
    pub text: String,
    pub number_in_surah: u32,
}

/// A full surah.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surah {
    pub number: u32,
    pub name: String,
    pub english_name: String,
    pub number_of_ayahs: u32,
    pub ayahs: Vec<SurahAyah>,
}

/// HTTP client for Quran text, tafsir, audio and page images.
pub struct QuranClient {
    http: reqwest::Client,
    base_url: String,
    page_image_url: String,
    reciter: String,
    cache: TypedCache<String, Value>,
}

impl QuranClient {
    pub fn new(config: &Config) -> Result<Self, QuranError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .user_agent(concat!("quran-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.quran_api_url.trim_end_matches('/').to_string(),
            page_image_url: config.quran_page_image_url.clone(),
            reciter: config.quran_reciter.clone(),
            cache: TypedCache::new("quran_content", CacheConfig::content()),
        })
    }

    /// Full surah text.
    pub async fn surah(&self, number: u32) -> Result<Surah, QuranError> {
        check_surah(number)?;
        self.fetch(&format!("surah/{number}/{TEXT_EDITION}")).await
    }

    /// Text of one ayah.
    pub async fn ayah(&self, surah: u32, ayah: u32) -> Result<Ayah, QuranError> {
        check_surah(surah)?;
        self.fetch(&format!("ayah/{surah}:{ayah}/{TEXT_EDITION}")).await
    }

    /// Tafsir of one ayah.
    pub async fn tafsir(&self, surah: u32, ayah: u32) -> Result<Ayah, QuranError> {
        check_surah(surah)?;
        self.fetch(&format!("ayah/{surah}:{ayah}/{TAFSIR_EDITION}")).await
    }

    /// Recitation audio URL of one ayah by the configured reciter.
    pub async fn audio_url(&self, surah: u32, ayah: u32) -> Result<String, QuranError> {
        check_surah(surah)?;
        let reference = format!("{surah}:{ayah}");
        let found: Ayah = self
            .fetch(&format!("ayah/{reference}/{}", self.reciter))
            .await?;
        found.audio.ok_or(QuranError::MissingAudio(reference))
    }

    /// Image URL of a mushaf page.
    pub fn page_image_url(&self, page: u32) -> Result<String, QuranError> {
        page_image_url(&self.page_image_url, page)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, QuranError> {
        let key = path.to_string();

        if let Some(cached) = self.cache.get(&key) {
            debug!("{} cache hit: {}", self.cache.name(), path);
            match serde_json::from_value(cached) {
                Ok(value) => return Ok(value),
                Err(_) => self.cache.invalidate(&key),
            }
        }

        let url = format!("{}/{}", self.base_url, path);
        debug!("Fetching {}", url);
        let envelope: Envelope = self.http.get(&url).send().await?.json().await?;
        let data = unwrap_envelope(envelope)?;

        let parsed = serde_json::from_value(data.clone())?;
        self.cache.insert(key, data);
        Ok(parsed)
    }
}

fn check_surah(number: u32) -> Result<(), QuranError> {
    if (1..=SURAH_COUNT).contains(&number) {
        Ok(())
    } else {
        Err(QuranError::InvalidSurah(number))
    }
}

fn unwrap_envelope(envelope: Envelope) -> Result<Value, QuranError> {
    if envelope.code == 200 {
        Ok(envelope.data)
    } else {
        Err(QuranError::Upstream {
            code: envelope.code,
            status: envelope.status,
        })
    }
}

/// Fill `{page}` in `template` with the zero-padded page number.
fn page_image_url(template: &str, page: u32) -> Result<String, QuranError> {
    if !(1..=PAGE_COUNT).contains(&page) {
        return Err(QuranError::InvalidPage(page));
    }
    Ok(template.replace("{page}", &format!("{page:03}")))
}

/// Parse a `surah:ayah` reference (also accepts `surah ayah`).
pub fn parse_reference(args: &[String]) -> Option<(u32, u32)> {
    match args {
        [single] => {
            let (surah, ayah) = single.split_once(':')?;
            Some((surah.trim().parse().ok()?, ayah.trim().parse().ok()?))
        }
        [surah, ayah, ..] => Some((surah.parse().ok()?, ayah.parse().ok()?)),
        [] => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn page_url_pads_and_validates() {
        let template = "https://example.org/page{page}.png";
        assert_eq!(
            page_image_url(template, 7).unwrap(),
            "https://example.org/page007.png"
        );
        assert_eq!(
            page_image_url(template, 604).unwrap(),
            "https://example.org/page604.png"
        );
        assert!(matches!(
            page_image_url(template, 0),
            Err(QuranError::InvalidPage(0))
        ));
        assert!(matches!(
            page_image_url(template, 605),
            Err(QuranError::InvalidPage(605))
        ));
    }

    #[test]
    fn surah_bounds() {
        assert!(check_surah(1).is_ok());
        assert!(check_surah(114).is_ok());
        assert!(matches!(check_surah(115), Err(QuranError::InvalidSurah(115))));
    }

    #[test]
    fn references_parse_in_both_forms() {
        assert_eq!(parse_reference(&args("2:255")), Some((2, 255)));
        assert_eq!(parse_reference(&args("2 255")), Some((2, 255)));
        assert_eq!(parse_reference(&args("2")), None);
        assert_eq!(parse_reference(&args("x:1")), None);
        assert_eq!(parse_reference(&[]), None);
    }

    #[test]
    fn ayah_payload_deserializes() {
        let raw = r#"{
            "code": 200, "status": "OK",
            "data": {
                "number": 262, "text": "ٱللَّهُ لَآ إِلَٰهَ إِلَّا هُوَ",
                "numberInSurah": 255,
                "audio": "https://cdn.example/262.mp3",
                "surah": {"number": 2, "name": "سُورَةُ البَقَرَةِ", "englishName": "Al-Baqara"}
            }
        }"#;
        let envelope: Envelope = serde_json::from_str(raw).unwrap();
        let ayah: Ayah = serde_json::from_value(unwrap_envelope(envelope).unwrap()).unwrap();
        assert_eq!(ayah.number_in_surah, 255);
        assert_eq!(ayah.surah.english_name, "Al-Baqara");
        assert_eq!(ayah.audio.as_deref(), Some("https://cdn.example/262.mp3"));
    }

    #[test]
    fn upstream_error_is_reported() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"code": 404, "status": "Not Found", "data": "bad ref"}"#)
                .unwrap();
        assert!(matches!(
            unwrap_envelope(envelope),
            Err(QuranError::Upstream { code: 404, .. })
        ));
    }
}
