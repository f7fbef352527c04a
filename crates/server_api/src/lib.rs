use shared::{
    domain::{HotelId, NAME_MAX_LEN},
    error::{ApiError, ErrorCode},
    protocol::{CitySummary, Hotel, HotelsResponse, SaveHotelRequest},
};
use storage::{SaveOutcome, Storage, StoredHotel};
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_cities(ctx: &ApiContext) -> Result<Vec<CitySummary>, ApiError> {
    let cities = ctx.storage.list_cities().await.map_err(internal)?;
    Ok(cities
        .into_iter()
        .map(|city| CitySummary {
            code: city.code,
            name: city.name,
        })
        .collect())
}

/// Hotels of the city whose display name is `city_name`.
pub async fn list_hotels(ctx: &ApiContext, city_name: &str) -> Result<HotelsResponse, ApiError> {
    let city = ctx
        .storage
        .city_by_name(city_name)
        .await
        .map_err(internal)?
        .ok_or_else(ApiError::city_not_found)?;
    let hotels = ctx
        .storage
        .list_hotels_for_city(&city.code)
        .await
        .map_err(internal)?;
    Ok(HotelsResponse::with_hotels(
        hotels.into_iter().map(hotel_payload).collect(),
    ))
}

/// Creates the hotel, or renames it when `(city, local_code)` already exists.
pub async fn save_hotel(ctx: &ApiContext, req: &SaveHotelRequest) -> Result<SaveOutcome, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "name must not be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("name exceeds {NAME_MAX_LEN} characters"),
        ));
    }
    if req.local_code.trim().is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            "local_code must not be empty",
        ));
    }

    ctx.storage
        .city_by_code(&req.city)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            ApiError::new(ErrorCode::Validation, "City matching query does not exist.")
        })?;

    let outcome = ctx
        .storage
        .save_hotel(&req.city, req.local_code.trim(), name)
        .await
        .map_err(internal)?;
    info!(city = %req.city, local_code = %req.local_code, ?outcome, "hotel saved");
    Ok(outcome)
}

pub async fn delete_hotel(ctx: &ApiContext, hotel_id: HotelId) -> Result<(), ApiError> {
    let deleted = ctx
        .storage
        .delete_hotel(hotel_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(ApiError::hotel_not_found());
    }
    info!(hotel_id = hotel_id.0, "hotel deleted");
    Ok(())
}

fn hotel_payload(hotel: StoredHotel) -> Hotel {
    Hotel {
        id: hotel.id,
        name: hotel.name,
        local_code: hotel.local_code,
        city: hotel.city_code,
    }
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> ApiContext {
        let storage = Storage::new("sqlite::memory:").await.expect("db");
        storage.upsert_city("ANT", "Antwerpen").await.expect("city");
        storage.upsert_city("BRU", "Brussel").await.expect("city");
        storage.save_hotel("ANT", "01", "Hotel 1").await.expect("hotel");
        storage.save_hotel("ANT", "02", "Hotel 2").await.expect("hotel");
        ApiContext { storage }
    }

    fn request(name: &str, local_code: &str, city: &str) -> SaveHotelRequest {
        SaveHotelRequest {
            name: name.to_string(),
            local_code: local_code.to_string(),
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn lists_hotels_by_city_name() {
        let ctx = setup().await;
        let response = list_hotels(&ctx, "Antwerpen").await.expect("hotels");
        let hotels = response.hotels.expect("hotels field");
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].name, "Hotel 1");
        assert_eq!(hotels[1].name, "Hotel 2");
        assert_eq!(hotels[0].city, "ANT");
    }

    #[tokio::test]
    async fn unknown_city_is_not_found() {
        let ctx = setup().await;
        let err = list_hotels(&ctx, "NonExistentCity")
            .await
            .expect_err("must fail");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "City not found");
    }

    #[tokio::test]
    async fn known_city_without_hotels_returns_empty_list() {
        let ctx = setup().await;
        let response = list_hotels(&ctx, "Brussel").await.expect("hotels");
        assert_eq!(response.hotels, Some(Vec::new()));
    }

    #[tokio::test]
    async fn save_creates_new_hotel() {
        let ctx = setup().await;
        let outcome = save_hotel(&ctx, &request("Hotel 3", "03", "ANT"))
            .await
            .expect("save");
        assert!(matches!(outcome, SaveOutcome::Created(_)));
        assert_eq!(
            list_hotels(&ctx, "Antwerpen")
                .await
                .expect("hotels")
                .hotels
                .expect("hotels")
                .len(),
            3
        );
    }

    #[tokio::test]
    async fn save_updates_name_of_existing_pair() {
        let ctx = setup().await;
        let outcome = save_hotel(&ctx, &request("Updated Hotel 1", "01", "ANT"))
            .await
            .expect("save");
        assert!(matches!(outcome, SaveOutcome::Updated(_)));

        let hotels = list_hotels(&ctx, "Antwerpen")
            .await
            .expect("hotels")
            .hotels
            .expect("hotels");
        assert_eq!(hotels.len(), 2);
        assert_eq!(hotels[0].name, "Updated Hotel 1");
    }

    #[tokio::test]
    async fn save_rejects_unknown_city_code() {
        let ctx = setup().await;
        let err = save_hotel(&ctx, &request("Hotel", "01", "XXX"))
            .await
            .expect_err("must fail");
        assert_eq!(err.code, ErrorCode::Validation);
    }

    #[tokio::test]
    async fn save_rejects_blank_or_oversized_names() {
        let ctx = setup().await;
        let blank = save_hotel(&ctx, &request("   ", "05", "ANT"))
            .await
            .expect_err("blank");
        assert_eq!(blank.code, ErrorCode::Validation);

        let long_name = "x".repeat(NAME_MAX_LEN + 1);
        let long = save_hotel(&ctx, &request(&long_name, "05", "ANT"))
            .await
            .expect_err("long");
        assert_eq!(long.code, ErrorCode::Validation);
    }

    #[tokio::test]
    async fn delete_missing_hotel_is_not_found() {
        let ctx = setup().await;
        let err = delete_hotel(&ctx, HotelId(999_999))
            .await
            .expect_err("must fail");
        assert_eq!(err.message, "Hotel not found");
    }

    #[tokio::test]
    async fn lists_cities_sorted_by_name() {
        let ctx = setup().await;
        let cities = list_cities(&ctx).await.expect("cities");
        let names: Vec<&str> = cities.iter().map(|city| city.name.as_str()).collect();
        assert_eq!(names, vec!["Antwerpen", "Brussel"]);
    }
}
