use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::{Navigation, PageBusy, PageState, targets_id};
use crate::model::{blank_draft, lookup_text, update};
use crate::store::UserStore;

pub const USER_CREATED: &str = "User created successfully!";

/// Form for a new user. The draft starts blank and is sent whole on submit.
pub struct CreatePage {
    store: Arc<dyn UserStore>,
    state: PageState<Value>,
}

impl CreatePage {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            state: PageState::new(blank_draft()),
        }
    }

    /// Applies one input change. The id belongs to the store and is ignored.
    pub fn change(&mut self, path: &str, value: &str) -> Result<(), PageBusy> {
        if self.state.is_loading() {
            return Err(PageBusy);
        }
        if targets_id(path) {
            debug!("ignoring edit of store-assigned id");
            return Ok(());
        }
        let draft = self.state.data_mut().take();
        *self.state.data_mut() = update(draft, path, value);
        Ok(())
    }

    /// Sends the draft. On success the caller should follow the returned
    /// navigation; on failure the draft is kept and the error is set.
    pub async fn submit(&mut self) -> Result<Option<Navigation>, PageBusy> {
        self.state.begin()?;
        match self.store.create(self.state.data()).await {
            Ok(created) => {
                self.state.settle();
                info!(id = %lookup_text(&created, "id"), "user created");
                Ok(Some(Navigation::to_users_with(USER_CREATED)))
            }
            Err(error) => {
                self.state.fail_store(&error);
                Ok(None)
            }
        }
    }

    pub fn state(&self) -> &PageState<Value> {
        &self.state
    }

    pub fn draft(&self) -> &Value {
        self.state.data()
    }
}
