//! Client for the ReccoBeats audio-features API.
//!
//! `GET {base}/audio-features?ids=a&ids=b&ids=c` answers with
//! `{"content": [{"id", "href", "tempo", ...}]}`. Tracks it has no analysis for
//! are silently left out, so the response is re-aligned to the requested IDs
//! with [`align_features`].

use std::collections::HashMap;

use reqwest::Client;

use crate::{
    config,
    library::FeatureSource,
    spotify::{RetryPolicy, send_with_backoff},
    types::{AnalysisEntry, AudioFeatures, AudioFeaturesResponse},
};

/// IDs per request.
pub const MAX_BATCH: usize = 40;

pub struct ReccoBeats {
    client: Client,
    base_url: String,
}

impl ReccoBeats {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(config::reccobeats_apiurl())
    }

    /// Raw entries for up to [`MAX_BATCH`] IDs.
    pub async fn get_entries(&self, ids: &[String]) -> Result<Vec<AnalysisEntry>, reqwest::Error> {
        let url = format!("{}/audio-features", self.base_url);
        let query: Vec<(&str, &str)> = ids.iter().map(|id| ("ids", id.as_str())).collect();

        let response = send_with_backoff(RetryPolicy::Idempotent, || {
            self.client
                .get(&url)
                .header("Accept", "application/json")
                .query(&query)
        })
        .await?;

        Ok(response.json::<AudioFeaturesResponse>().await?.content)
    }

    /// Features for `ids`, one entry per ID in request order. Tracks without
    /// analysis get an all-`None` record.
    pub async fn get_audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<AudioFeatures>, reqwest::Error> {
        let mut features = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_BATCH) {
            let entries = self.get_entries(chunk).await?;
            features.extend(align_features(chunk, &entries));
        }
        Ok(features)
    }
}

impl FeatureSource for ReccoBeats {
    type Error = reqwest::Error;

    async fn audio_features(&mut self, ids: &[String]) -> Result<Vec<AudioFeatures>, Self::Error> {
        self.get_audio_features(ids).await
    }
}

/// Pairs response entries with the requested Spotify IDs via the trailing
/// segment of each entry's `href`.
///
/// The result has exactly one element per requested ID, in request order.
/// IDs the service dropped get `AudioFeatures::default()`, every feature
/// `None`.
pub fn align_features(requested: &[String], entries: &[AnalysisEntry]) -> Vec<AudioFeatures> {
    let by_id: HashMap<&str, &AnalysisEntry> = entries
        .iter()
        .filter_map(|entry| entry.spotify_id().map(|id| (id, entry)))
        .collect();

    requested
        .iter()
        .map(|id| {
            by_id
                .get(id.as_str())
                .map(|entry| entry.to_features())
                .unwrap_or_default()
        })
        .collect()
}
