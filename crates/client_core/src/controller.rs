use std::sync::Arc;

use shared::domain::HotelId;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

use crate::{
    api::HotelApi,
    form::FormState,
    render::{remove_hotel, render_hotel_list, FetchOutcome, HotelListView, ListItem, ListPatch},
    sequencer::RequestSequencer,
};

/// City filter values must be longer than this before a fetch is issued.
pub const MIN_CITY_QUERY_LEN: usize = 2;

pub const SAVE_SUCCEEDED: &str = "Hotel saved successfully";
pub const SAVE_FAILED: &str = "Error saving hotel";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this hotel?";
pub const DELETE_SUCCEEDED: &str = "Hotel deleted successfully";
pub const DELETE_FAILED: &str = "Error deleting hotel";

/// Blocking user dialogs of the host page.
pub trait Prompt: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    ListPatched(ListPatch),
    FormChanged(FormState),
    Alert(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityFetch {
    /// Filter too short; nothing was requested and the list is unchanged.
    Skipped,
    Rendered,
    /// A newer fetch started before this one could render.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed,
}

pub struct HotelListController {
    api: Arc<dyn HotelApi>,
    prompt: Arc<dyn Prompt>,
    city_filter: Mutex<String>,
    form: Mutex<FormState>,
    view: Mutex<HotelListView>,
    sequencer: RequestSequencer,
    events: broadcast::Sender<ControllerEvent>,
}

impl HotelListController {
    pub fn new(api: Arc<dyn HotelApi>, prompt: Arc<dyn Prompt>) -> Arc<Self> {
        Self::with_city_filter(api, prompt, "")
    }

    pub fn with_city_filter(
        api: Arc<dyn HotelApi>,
        prompt: Arc<dyn Prompt>,
        city_filter: impl Into<String>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            prompt,
            city_filter: Mutex::new(city_filter.into()),
            form: Mutex::new(FormState::default()),
            view: Mutex::new(HotelListView::default()),
            sequencer: RequestSequencer::new(),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Page ready: fetch the list for whatever the filter already holds.
    pub async fn initialize(&self) -> CityFetch {
        self.on_city_change().await
    }

    /// Updates the filter value without committing it.
    pub async fn set_city_filter(&self, value: impl Into<String>) {
        *self.city_filter.lock().await = value.into();
    }

    pub async fn city_filter(&self) -> String {
        self.city_filter.lock().await.clone()
    }

    /// Sets the filter and commits it.
    pub async fn change_city(&self, value: impl Into<String>) -> CityFetch {
        self.set_city_filter(value).await;
        self.on_city_change().await
    }

    pub async fn on_city_change(&self) -> CityFetch {
        let city = self.city_filter.lock().await.clone();
        if city.chars().count() <= MIN_CITY_QUERY_LEN {
            debug!(%city, "city filter too short; keeping current list");
            return CityFetch::Skipped;
        }

        let mut ticket = self.sequencer.begin();
        let seq = ticket.seq();
        let result = tokio::select! {
            result = self.api.list_hotels(&city) => result,
            _ = ticket.aborted() => {
                debug!(%city, seq, "hotel fetch aborted by newer request");
                return CityFetch::Superseded;
            }
        };

        let outcome = match &result {
            Ok(response) => FetchOutcome::Loaded(response),
            Err(err) => {
                error!(%city, error = %err, "failed to fetch hotels");
                FetchOutcome::Failed
            }
        };
        let patch = render_hotel_list(outcome);

        {
            let mut view = self.view.lock().await;
            if !ticket.is_current() {
                debug!(%city, seq, "dropping stale hotel list");
                return CityFetch::Superseded;
            }
            view.apply(&patch);
            // Published under the view lock so event order matches apply order.
            self.publish(ControllerEvent::ListPatched(patch));
        }
        CityFetch::Rendered
    }

    pub async fn form(&self) -> FormState {
        self.form.lock().await.clone()
    }

    /// Edits form fields the way typing into the inputs would.
    pub async fn update_form(&self, edit: impl FnOnce(&mut FormState)) {
        let mut form = self.form.lock().await;
        edit(&mut form);
        self.publish(ControllerEvent::FormChanged(form.clone()));
    }

    pub async fn on_form_submit(&self) -> SubmitOutcome {
        let payload = self.form.lock().await.to_request();

        if let Err(err) = self.api.save_hotel(&payload).await {
            error!(
                city = %payload.city,
                local_code = %payload.local_code,
                error = %err,
                "failed to save hotel"
            );
            self.alert(SAVE_FAILED);
            return SubmitOutcome::Failed;
        }

        info!(city = %payload.city, local_code = %payload.local_code, "hotel saved");
        self.alert(SAVE_SUCCEEDED);
        self.update_form(FormState::reset).await;
        self.on_city_change().await;
        SubmitOutcome::Saved
    }

    /// Loads a listed hotel into the form. No id is carried, so saving the
    /// form only updates when the backend matches it by city and local code.
    pub async fn edit_hotel(&self, name: &str, city: &str, local_code: &str) {
        self.update_form(|form| form.populate(name, city, local_code))
            .await;
    }

    pub async fn delete_hotel(&self, hotel_id: HotelId) -> DeleteOutcome {
        if !self.prompt.confirm(DELETE_CONFIRMATION) {
            return DeleteOutcome::Cancelled;
        }

        if let Err(err) = self.api.delete_hotel(hotel_id).await {
            error!(hotel_id = hotel_id.0, error = %err, "failed to delete hotel");
            self.alert(DELETE_FAILED);
            return DeleteOutcome::Failed;
        }

        info!(hotel_id = hotel_id.0, "hotel deleted");
        self.alert(DELETE_SUCCEEDED);
        let patch = remove_hotel(hotel_id);
        let mut view = self.view.lock().await;
        if view.apply(&patch) {
            self.publish(ControllerEvent::ListPatched(patch));
        } else {
            debug!(hotel_id = hotel_id.0, "deleted hotel was not in the rendered list");
        }
        DeleteOutcome::Deleted
    }

    pub async fn list_items(&self) -> Vec<ListItem> {
        self.view.lock().await.items().to_vec()
    }

    pub async fn view(&self) -> HotelListView {
        self.view.lock().await.clone()
    }

    fn alert(&self, message: &str) {
        self.prompt.alert(message);
        self.publish(ControllerEvent::Alert(message.to_string()));
    }

    fn publish(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
