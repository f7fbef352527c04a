use server_api::ApiContext;

use crate::csrf::CsrfToken;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) csrf: CsrfToken,
}
