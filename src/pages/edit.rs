use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use super::{Navigation, PageBusy, PageState, targets_id};
use crate::model::{UserId, update};
use crate::store::UserStore;

pub const USER_UPDATED: &str = "User updated successfully!";

/// Form over an existing user. The whole fetched record, with edits applied,
/// replaces the stored one on submit.
pub struct EditPage {
    store: Arc<dyn UserStore>,
    id: UserId,
    state: PageState<Option<Value>>,
}

impl EditPage {
    pub fn new(store: Arc<dyn UserStore>, id: UserId) -> Self {
        Self {
            store,
            id,
            state: PageState::new(None),
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub async fn activate(&mut self) -> Result<(), PageBusy> {
        self.state.begin()?;
        match self.store.get(&self.id).await {
            Ok(record) => self.state.succeed(Some(record)),
            Err(error) => self.state.fail_store(&error),
        }
        Ok(())
    }

    /// Applies one input change to the loaded record. The id is read-only.
    pub fn change(&mut self, path: &str, value: &str) -> Result<(), PageBusy> {
        if self.state.is_loading() {
            return Err(PageBusy);
        }
        if targets_id(path) {
            debug!(id = %self.id, "ignoring edit of store-assigned id");
            return Ok(());
        }
        if let Some(record) = self.state.data_mut().take() {
            *self.state.data_mut() = Some(update(record, path, value));
        }
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<Option<Navigation>, PageBusy> {
        self.state.begin()?;
        let Some(record) = self.state.data() else {
            self.state.fail("user has not been loaded");
            return Ok(None);
        };
        match self.store.update(&self.id, record).await {
            Ok(_) => {
                self.state.settle();
                info!(id = %self.id, "user updated");
                Ok(Some(Navigation::to_users_with(USER_UPDATED)))
            }
            Err(error) => {
                self.state.fail_store(&error);
                Ok(None)
            }
        }
    }

    pub fn state(&self) -> &PageState<Option<Value>> {
        &self.state
    }

    pub fn record(&self) -> Option<&Value> {
        self.state.data().as_ref()
    }
}
