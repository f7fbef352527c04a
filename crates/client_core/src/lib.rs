//! Client side of the hotel management page: a typed HTTP client for the
//! hotel API and the controller that keeps the rendered hotel list, the edit
//! form and the city filter in sync with it.

pub mod api;
pub mod controller;
pub mod csrf;
pub mod error;
pub mod form;
pub mod render;
pub mod sequencer;

pub use api::{HotelApi, HttpHotelApi};
pub use controller::{
    CityFetch, ControllerEvent, DeleteOutcome, HotelListController, Prompt, SubmitOutcome,
};
pub use error::ClientError;
pub use form::FormState;
pub use render::{HotelItem, HotelListView, ListItem, ListPatch};
