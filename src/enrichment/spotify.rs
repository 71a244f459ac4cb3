//! Spotify Web API client used to enrich dataset tracks.
//!
//! Authenticates with the client-credentials flow. The access token is fetched
//! lazily, refreshed shortly before it expires, and force-refreshed once when
//! the API answers 401.

use super::gateway::{Enrichment, EnrichmentError, EnrichmentGateway, RelatedTrack};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

pub const DEFAULT_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com";

/// Tokens are considered expired this long before Spotify says they are.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

pub struct SpotifyClient {
    client: Client,
    credentials: SpotifyCredentials,
    accounts_base_url: String,
    api_base_url: String,
    token: RwLock<Option<AccessToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<SpotifyTrack>,
}

#[derive(Deserialize)]
struct SpotifyTrack {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    album: Option<SpotifyAlbum>,
    preview_url: Option<String>,
}

#[derive(Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Deserialize)]
struct SpotifyImage {
    url: String,
}

impl SpotifyTrack {
    fn cover_url(&self) -> Option<String> {
        self.album
            .as_ref()
            .and_then(|album| album.images.first())
            .map(|image| image.url.clone())
    }

    fn into_enrichment(self) -> Enrichment {
        Enrichment {
            cover_url: self.cover_url(),
            external_id: self.id,
            preview_url: self.preview_url,
        }
    }

    fn into_related_track(self) -> RelatedTrack {
        RelatedTrack {
            cover_url: self.cover_url(),
            artist: self
                .artists
                .first()
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            external_id: self.id,
            track_name: self.name,
            preview_url: self.preview_url,
        }
    }
}

impl SpotifyClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `credentials` - Client id and secret of the Spotify application.
    /// * `accounts_base_url` - Base URL of the accounts service (token endpoint).
    /// * `api_base_url` - Base URL of the Web API.
    /// * `timeout` - Timeout applied to every HTTP request.
    pub fn new(
        credentials: SpotifyCredentials,
        accounts_base_url: &str,
        api_base_url: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            credentials,
            accounts_base_url: accounts_base_url.trim_end_matches('/').to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    async fn access_token(&self) -> Result<String, EnrichmentError> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_valid() {
                return Ok(token.value.clone());
            }
        }
        self.refresh_token(None).await
    }

    /// Fetches a new token unless another task already replaced `stale`.
    async fn refresh_token(&self, stale: Option<&str>) -> Result<String, EnrichmentError> {
        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_ref() {
            if token.is_valid() && Some(token.value.as_str()) != stale {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting a new Spotify access token");
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_base_url))
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Auth(format!(
                "token request failed with status {}",
                response.status()
            )));
        }

        let body: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        info!("Obtained Spotify access token valid for {}s", lifetime.as_secs());

        let value = body.access_token;
        *guard = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    /// GET with bearer auth, retrying once with a fresh token on 401.
    async fn authorized_get(&self, url: &str) -> Result<Response, EnrichmentError> {
        let token = self.access_token().await?;
        let response = self.client.get(url).bearer_auth(&token).send().await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Spotify rejected the access token, refreshing");
            let token = self.refresh_token(Some(&token)).await?;
            self.client.get(url).bearer_auth(&token).send().await?
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl EnrichmentGateway for SpotifyClient {
    fn name(&self) -> &str {
        "spotify"
    }

    async fn lookup(
        &self,
        track_name: &str,
        artist: &str,
    ) -> Result<Option<Enrichment>, EnrichmentError> {
        let query = format!("track:{} artist:{}", track_name, artist);
        let url = format!(
            "{}/v1/search?q={}&type=track&limit=1",
            self.api_base_url,
            urlencoding::encode(&query)
        );

        let body: SearchResponse = self.authorized_get(&url).await?.json().await?;

        Ok(body
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(SpotifyTrack::into_enrichment))
    }

    async fn related(&self, external_id: &str) -> Result<Vec<RelatedTrack>, EnrichmentError> {
        let url = format!(
            "{}/v1/recommendations?seed_tracks={}",
            self.api_base_url,
            urlencoding::encode(external_id)
        );

        let body: RecommendationsResponse = self.authorized_get(&url).await?.json().await?;

        Ok(body
            .tracks
            .into_iter()
            .map(SpotifyTrack::into_related_track)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> SpotifyCredentials {
        SpotifyCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    #[test]
    fn trailing_slashes_are_removed() {
        let client = SpotifyClient::new(
            credentials(),
            "http://localhost:1/",
            "http://localhost:2/",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.api_base_url(), "http://localhost:2");
        assert_eq!(client.accounts_base_url, "http://localhost:1");
    }

    #[test]
    fn parses_search_item_without_images_or_preview() {
        let json = r#"{"tracks":{"items":[{"id":"abc","name":"Song","artists":[],"album":{"images":[]},"preview_url":null}]}}"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        let enrichment = body
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .map(SpotifyTrack::into_enrichment)
            .unwrap();

        assert_eq!(enrichment.external_id, "abc");
        assert_eq!(enrichment.cover_url, None);
        assert_eq!(enrichment.preview_url, None);
    }

    #[test]
    fn related_track_takes_first_artist_and_image() {
        let json = r#"{"tracks":[{"id":"r1","name":"Other","artists":[{"name":"A"},{"name":"B"}],"album":{"images":[{"url":"big"},{"url":"small"}]},"preview_url":"p"}]}"#;
        let body: RecommendationsResponse = serde_json::from_str(json).unwrap();
        let related: Vec<RelatedTrack> = body
            .tracks
            .into_iter()
            .map(SpotifyTrack::into_related_track)
            .collect();

        assert_eq!(
            related,
            vec![RelatedTrack {
                external_id: "r1".to_string(),
                track_name: "Other".to_string(),
                artist: "A".to_string(),
                cover_url: Some("big".to_string()),
                preview_url: Some("p".to_string()),
            }]
        );
    }

    #[test]
    fn missing_recommendations_parse_as_empty() {
        let body: RecommendationsResponse = serde_json::from_str("{}").unwrap();
        assert!(body.tracks.is_empty());
    }

    #[test]
    fn token_validity_follows_expiry() {
        let valid = AccessToken {
            value: "t".to_string(),
            expires_at: Instant::now() + Duration::from_secs(30),
        };
        let expired = AccessToken {
            value: "t".to_string(),
            expires_at: Instant::now() - Duration::from_secs(1),
        };
        assert!(valid.is_valid());
        assert!(!expired.is_valid());
    }
}
