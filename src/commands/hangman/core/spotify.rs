use std::time::Duration;

use backoff::{future::retry, ExponentialBackoff};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{header::AUTHORIZATION, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

use super::words::{WordSource, WordSourceError};

/// Client id and secret of a Spotify app.
#[derive(Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl SpotifyCredentials {
    fn basic_auth(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        format!("Basic {encoded}")
    }
}

/// Uses the track names of a Spotify playlist as words. The pool is the
/// playlist id.
#[derive(Debug, Clone)]
pub struct SpotifyWords {
    client: reqwest::Client,
    credentials: SpotifyCredentials,
    max_pages: u32,
}

impl SpotifyWords {
    const TOKEN_URL: &'static str = "https://accounts.spotify.com/api/token";
    const API_URL: &'static str = "https://api.spotify.com/v1/";
    const RETRY_FOR: Duration = Duration::from_secs(10);

    pub fn new(credentials: SpotifyCredentials, max_pages: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            max_pages: max_pages.max(1),
        }
    }

    fn policy() -> ExponentialBackoff {
        ExponentialBackoff {
            max_elapsed_time: Some(Self::RETRY_FOR),
            ..ExponentialBackoff::default()
        }
    }

    fn tracks_url(playlist: &str) -> Result<Url, WordSourceError> {
        Url::parse(Self::API_URL)
            .and_then(|api| api.join(&format!("playlists/{playlist}/tracks")))
            .map_err(|err| WordSourceError::UpstreamUnavailable(err.to_string()))
    }

    async fn request_token(&self) -> Result<TokenResponse, backoff::Error<reqwest::Error>> {
        let response = self
            .client
            .post(Self::TOKEN_URL)
            .header(AUTHORIZATION, self.credentials.basic_auth())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transient_or_permanent)?;

        response.json().await.map_err(backoff::Error::permanent)
    }

    async fn request_page(
        &self,
        url: &Url,
        token: &str,
    ) -> Result<PlaylistPage, backoff::Error<reqwest::Error>> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transient_or_permanent)?;

        response.json().await.map_err(backoff::Error::permanent)
    }

    async fn access_token(&self) -> Result<String, WordSourceError> {
        let token = retry(Self::policy(), || self.request_token()).await?;
        trace!("fetched spotify access token");

        Ok(token.access_token)
    }

    async fn page(&self, url: Url, token: &str) -> Result<PlaylistPage, WordSourceError> {
        Ok(retry(Self::policy(), || self.request_page(&url, token)).await?)
    }
}

impl WordSource for SpotifyWords {
    #[instrument(skip(self))]
    async fn fetch_candidates(&self, pool: &str) -> Result<Vec<String>, WordSourceError> {
        let token = self.access_token().await?;

        let mut url = Some(Self::tracks_url(pool)?);
        let mut names = Vec::new();
        let mut pages = 0;

        while let Some(next) = url.take() {
            if pages == self.max_pages {
                debug!(pages, "stopping at page limit");
                break;
            }

            let page = self.page(next, &token).await?;
            pages += 1;

            url = page
                .next
                .as_deref()
                .and_then(|next| Url::parse(next).ok());

            match page.track_names() {
                Some(page_names) => names.extend(page_names),
                None if names.is_empty() => {
                    warn!("spotify response is missing `items`");
                    return Err(WordSourceError::EmptyCatalog(pool.to_owned()));
                }
                None => break,
            }
        }

        debug!(count = names.len(), pages, "fetched track names");

        if names.is_empty() {
            Err(WordSourceError::EmptyCatalog(pool.to_owned()))
        } else {
            Ok(names)
        }
    }
}

fn transient_or_permanent(err: reqwest::Error) -> backoff::Error<reqwest::Error> {
    let transient = err.is_timeout()
        || err.is_connect()
        || err
            .status()
            .is_some_and(|status| status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS);

    if transient {
        backoff::Error::transient(err)
    } else {
        backoff::Error::permanent(err)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    items: Option<Vec<PlaylistItem>>,
    next: Option<String>,
}

impl PlaylistPage {
    /// `None` if the response has no `items` at all.
    fn track_names(self) -> Option<Vec<String>> {
        let names = self
            .items?
            .into_iter()
            .filter_map(|item| item.track)
            .map(|track| track.name)
            .filter(|name| !name.trim().is_empty())
            .collect();

        Some(names)
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    track: Option<Track>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_track_names() {
        let page: PlaylistPage = serde_json::from_str(
            r#"{
                "items": [
                    { "added_at": "2024-01-01T00:00:00Z", "track": { "name": "Espresso", "id": "a" } },
                    { "track": null },
                    { "track": { "name": "  " } },
                    { "track": { "name": "Die With A Smile" } }
                ],
                "next": "https://api.spotify.com/v1/playlists/x/tracks?offset=100&limit=100",
                "total": 150
            }"#,
        )
        .expect("hard-coded json");

        assert!(page.next.is_some());
        assert_eq!(
            page.track_names(),
            Some(vec!["Espresso".to_owned(), "Die With A Smile".to_owned()])
        );
    }

    #[test]
    fn missing_items_is_none() {
        let page: PlaylistPage =
            serde_json::from_str(r#"{ "error": { "status": 404 } }"#).expect("hard-coded json");

        assert_eq!(page.track_names(), None);
    }

    #[test]
    fn tracks_url_for_playlist() {
        let url = SpotifyWords::tracks_url("0gAVMCYREjceFfjG5phYxl").expect("valid id");
        assert_eq!(
            url.as_str(),
            "https://api.spotify.com/v1/playlists/0gAVMCYREjceFfjG5phYxl/tracks"
        );
    }

    #[test]
    fn basic_auth_header() {
        let credentials = SpotifyCredentials {
            client_id: "id".to_owned(),
            client_secret: "secret".to_owned(),
        };

        assert_eq!(credentials.basic_auth(), "Basic aWQ6c2VjcmV0");
    }
}
