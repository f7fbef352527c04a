use serde::{Deserialize, Serialize};

use crate::domain::HotelId;

/// Header carrying the anti-forgery token on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";
/// Element id of the hidden input the page template puts the token in.
pub const CSRF_ELEMENT_ID: &str = "csrf-token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: HotelId,
    pub name: String,
    pub local_code: String,
    /// City code the hotel belongs to.
    pub city: String,
}

/// Body of `GET /api/hotels/{city}/`.
///
/// `hotels` is absent when the backend answered with an error body instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotels: Option<Vec<Hotel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HotelsResponse {
    pub fn with_hotels(hotels: Vec<Hotel>) -> Self {
        Self {
            hotels: Some(hotels),
            error: None,
        }
    }
}

/// Body of `POST /api/hotels/`. `city` is a city code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHotelRequest {
    pub name: String,
    pub local_code: String,
    pub city: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySummary {
    pub code: String,
    pub name: String,
}

pub fn hotels_for_city_route(city_name: &str) -> String {
    format!("/api/hotels/{city_name}/")
}

pub fn save_hotel_route() -> &'static str {
    "/api/hotels/"
}

pub fn delete_hotel_route(hotel_id: HotelId) -> String {
    format!("/api/hotels/delete/{}/", hotel_id.0)
}
