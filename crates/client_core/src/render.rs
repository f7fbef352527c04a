//! Rendering of fetch results into list patches, and the list those patches
//! are applied to.

use shared::{
    domain::HotelId,
    protocol::{Hotel, HotelsResponse},
};

pub const NO_HOTELS_FOUND: &str = "No hotels found";
pub const ERROR_FETCHING_DATA: &str = "Error fetching data";

/// What a city fetch produced, as far as rendering cares.
#[derive(Debug, Clone, Copy)]
pub enum FetchOutcome<'a> {
    Loaded(&'a HotelsResponse),
    Failed,
}

/// Arguments the Edit button hands back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBinding {
    pub name: String,
    pub city: String,
    pub local_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelItem {
    pub element_id: String,
    pub label: String,
    pub edit: EditBinding,
    pub delete: HotelId,
}

impl HotelItem {
    pub fn from_hotel(hotel: &Hotel) -> Self {
        Self {
            element_id: hotel_element_id(hotel.id),
            label: format!("{} - {}", hotel.local_code, hotel.name),
            edit: EditBinding {
                name: hotel.name.clone(),
                city: hotel.city.clone(),
                local_code: hotel.local_code.clone(),
            },
            delete: hotel.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Hotel(HotelItem),
    Placeholder(String),
}

impl ListItem {
    pub fn text(&self) -> &str {
        match self {
            ListItem::Hotel(item) => &item.label,
            ListItem::Placeholder(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPatch {
    Replace(Vec<ListItem>),
    Remove { element_id: String },
}

pub fn hotel_element_id(hotel_id: HotelId) -> String {
    format!("hotel-{}", hotel_id.0)
}

pub fn render_hotel_list(outcome: FetchOutcome<'_>) -> ListPatch {
    let items = match outcome {
        FetchOutcome::Loaded(HotelsResponse {
            hotels: Some(hotels),
            ..
        }) if !hotels.is_empty() => hotels
            .iter()
            .map(|hotel| ListItem::Hotel(HotelItem::from_hotel(hotel)))
            .collect(),
        FetchOutcome::Loaded(_) => vec![ListItem::Placeholder(NO_HOTELS_FOUND.to_string())],
        FetchOutcome::Failed => vec![ListItem::Placeholder(ERROR_FETCHING_DATA.to_string())],
    };
    ListPatch::Replace(items)
}

pub fn remove_hotel(hotel_id: HotelId) -> ListPatch {
    ListPatch::Remove {
        element_id: hotel_element_id(hotel_id),
    }
}

/// The rendered hotel list. It is the only record of what is on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotelListView {
    items: Vec<ListItem>,
}

impl HotelListView {
    /// Returns whether the list changed.
    pub fn apply(&mut self, patch: &ListPatch) -> bool {
        match patch {
            ListPatch::Replace(items) => {
                self.items = items.clone();
                true
            }
            ListPatch::Remove { element_id } => {
                let before = self.items.len();
                self.items.retain(|item| {
                    !matches!(item, ListItem::Hotel(hotel) if &hotel.element_id == element_id)
                });
                self.items.len() != before
            }
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn hotel_items(&self) -> impl Iterator<Item = &HotelItem> {
        self.items.iter().filter_map(|item| match item {
            ListItem::Hotel(hotel) => Some(hotel),
            ListItem::Placeholder(_) => None,
        })
    }

    pub fn find(&self, element_id: &str) -> Option<&HotelItem> {
        self.hotel_items().find(|item| item.element_id == element_id)
    }

    pub fn texts(&self) -> Vec<&str> {
        self.items.iter().map(ListItem::text).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(id: i64, local_code: &str, name: &str) -> Hotel {
        Hotel {
            id: HotelId(id),
            name: name.to_string(),
            local_code: local_code.to_string(),
            city: "PAR".to_string(),
        }
    }

    #[test]
    fn renders_one_item_per_hotel_in_order() {
        let response = HotelsResponse::with_hotels(vec![
            hotel(4, "02", "Ritz"),
            hotel(2, "01", "Le Meurice"),
        ]);
        let patch = render_hotel_list(FetchOutcome::Loaded(&response));
        let ListPatch::Replace(items) = patch else {
            panic!("expected replace patch");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text(), "02 - Ritz");
        let ListItem::Hotel(second) = &items[1] else {
            panic!("expected hotel item");
        };
        assert_eq!(second.element_id, "hotel-2");
        assert_eq!(second.delete, HotelId(2));
        assert_eq!(
            second.edit,
            EditBinding {
                name: "Le Meurice".to_string(),
                city: "PAR".to_string(),
                local_code: "01".to_string(),
            }
        );
    }

    #[test]
    fn empty_or_missing_hotels_render_placeholder() {
        let empty = HotelsResponse::with_hotels(Vec::new());
        let missing = HotelsResponse::default();
        for response in [&empty, &missing] {
            assert_eq!(
                render_hotel_list(FetchOutcome::Loaded(response)),
                ListPatch::Replace(vec![ListItem::Placeholder(NO_HOTELS_FOUND.to_string())])
            );
        }
    }

    #[test]
    fn failed_fetch_renders_error_placeholder() {
        assert_eq!(
            render_hotel_list(FetchOutcome::Failed),
            ListPatch::Replace(vec![ListItem::Placeholder(
                ERROR_FETCHING_DATA.to_string()
            )])
        );
    }

    #[test]
    fn remove_only_drops_matching_element() {
        let response = HotelsResponse::with_hotels(vec![
            hotel(1, "01", "A"),
            hotel(11, "11", "B"),
            hotel(12, "12", "C"),
        ]);
        let mut view = HotelListView::default();
        view.apply(&render_hotel_list(FetchOutcome::Loaded(&response)));

        assert!(view.apply(&remove_hotel(HotelId(1))));
        assert_eq!(view.texts(), vec!["11 - B", "12 - C"]);
        assert!(!view.apply(&remove_hotel(HotelId(1))));
        assert!(view.find("hotel-11").is_some());
    }
}
