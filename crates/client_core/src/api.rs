use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::HotelId,
    protocol::{HotelsResponse, SaveHotelRequest, CSRF_HEADER},
};
use tracing::{debug, warn};
use url::Url;

use crate::{csrf::extract_csrf_token, error::ClientError};

/// Network seam of the controller.
#[async_trait]
pub trait HotelApi: Send + Sync {
    /// `GET /api/hotels/{city}/`. Error bodies that still parse as JSON come
    /// back as a response without `hotels`.
    async fn list_hotels(&self, city: &str) -> Result<HotelsResponse, ClientError>;
    /// `POST /api/hotels/`; the backend decides between create and update.
    async fn save_hotel(&self, hotel: &SaveHotelRequest) -> Result<(), ClientError>;
    /// `DELETE /api/hotels/delete/{id}/`.
    async fn delete_hotel(&self, hotel_id: HotelId) -> Result<(), ClientError>;
}

pub struct HttpHotelApi {
    http: Client,
    base_url: Url,
    csrf_token: String,
}

impl HttpHotelApi {
    pub fn new(server_url: &str, csrf_token: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_base_url(server_url)?,
            csrf_token: csrf_token.into(),
        })
    }

    /// Loads the management page and takes the csrf token from it.
    pub async fn connect(server_url: &str) -> Result<Self, ClientError> {
        let http = Client::new();
        let base_url = parse_base_url(server_url)?;
        let page_url = base_url.to_string();

        let res = http
            .get(base_url.clone())
            .send()
            .await
            .map_err(|source| transport(&page_url, source))?;
        if !res.status().is_success() {
            return Err(ClientError::Status {
                url: page_url,
                status: res.status().as_u16(),
            });
        }
        let html = res
            .text()
            .await
            .map_err(|source| transport(&page_url, source))?;
        let csrf_token = extract_csrf_token(&html)
            .ok_or_else(|| ClientError::MissingCsrfToken { url: page_url })?;

        debug!(server_url = %base_url, "loaded csrf token from page");
        Ok(Self {
            http,
            base_url,
            csrf_token,
        })
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Builds `base/<segments>/` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "url cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }
}

#[async_trait]
impl HotelApi for HttpHotelApi {
    async fn list_hotels(&self, city: &str) -> Result<HotelsResponse, ClientError> {
        let url = self.endpoint(&["api", "hotels", city])?;
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| transport(url.as_str(), source))?;
        let status = res.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "hotel list answered with non-success status");
        }
        decode_json(url.as_str(), res).await
    }

    async fn save_hotel(&self, hotel: &SaveHotelRequest) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "hotels"])?;
        let res = self
            .http
            .post(url.clone())
            .header(CSRF_HEADER, &self.csrf_token)
            .json(hotel)
            .send()
            .await
            .map_err(|source| transport(url.as_str(), source))?;
        ensure_success(url.as_str(), res.status())
    }

    async fn delete_hotel(&self, hotel_id: HotelId) -> Result<(), ClientError> {
        let id = hotel_id.0.to_string();
        let url = self.endpoint(&["api", "hotels", "delete", &id])?;
        let res = self
            .http
            .delete(url.clone())
            .header(CSRF_HEADER, &self.csrf_token)
            .send()
            .await
            .map_err(|source| transport(url.as_str(), source))?;
        ensure_success(url.as_str(), res.status())
    }
}

fn parse_base_url(server_url: &str) -> Result<Url, ClientError> {
    let url = Url::parse(server_url.trim()).map_err(|err| ClientError::InvalidUrl {
        url: server_url.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: server_url.to_string(),
            reason: "url cannot be a base".to_string(),
        });
    }
    Ok(url)
}

async fn decode_json<T: DeserializeOwned>(
    url: &str,
    res: reqwest::Response,
) -> Result<T, ClientError> {
    let bytes = res
        .bytes()
        .await
        .map_err(|source| transport(url, source))?;
    serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

fn ensure_success(url: &str, status: StatusCode) -> Result<(), ClientError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn transport(url: &str, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: url.to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
