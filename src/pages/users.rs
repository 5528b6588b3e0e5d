use std::sync::Arc;

use tracing::info;

use super::{Lifecycle, Navigation, PageBusy, PageState, Route, TransientNotice};
use crate::model::{User, UserId};
use crate::store::UserStore;

pub const USER_DELETED: &str = "User deleted successfully!";

/// The user table with edit and delete actions.
pub struct UsersPage {
    store: Arc<dyn UserStore>,
    state: PageState<Vec<User>>,
    notice: TransientNotice,
    lifecycle: Lifecycle,
}

impl UsersPage {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            state: PageState::new(Vec::new()),
            notice: TransientNotice::new(),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Shows the notice handed over by the previous page, if any, then
    /// loads the table.
    pub async fn activate(&mut self, incoming: Option<String>) -> Result<(), PageBusy> {
        if let Some(message) = incoming {
            self.notice.show(message, &mut self.lifecycle);
        }
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<(), PageBusy> {
        self.state.begin()?;
        match self.store.list().await {
            Ok(users) => self.state.succeed(users),
            Err(error) => self.state.fail_store(&error),
        }
        Ok(())
    }

    /// Deletes on the store first; the row only leaves the table once the
    /// store has confirmed.
    pub async fn delete(&mut self, id: &UserId) -> Result<(), PageBusy> {
        self.state.begin()?;
        match self.store.delete(id).await {
            Ok(()) => {
                self.state
                    .data_mut()
                    .retain(|user| user.id.as_ref() != Some(id));
                self.state.settle();
                info!(%id, "user deleted");
                self.notice.show(USER_DELETED, &mut self.lifecycle);
            }
            Err(error) => self.state.fail_store(&error),
        }
        Ok(())
    }

    pub fn edit(&self, id: UserId) -> Navigation {
        Navigation {
            to: Route::Edit(id),
            notice: None,
        }
    }

    pub fn add_new(&self) -> Navigation {
        Navigation {
            to: Route::Create,
            notice: None,
        }
    }

    pub fn state(&self) -> &PageState<Vec<User>> {
        &self.state
    }

    pub fn notice(&self) -> Option<String> {
        self.notice.current()
    }

    pub fn deactivate(&mut self) {
        self.lifecycle.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::Phase;
    use crate::store::StoreError;
    use crate::store::fake::{FakeUserStore, sample_user};
    use std::time::Duration;

    fn two_users() -> Arc<FakeUserStore> {
        Arc::new(FakeUserStore::with_users(vec![
            sample_user("1", "Leanne"),
            sample_user("2", "Ervin"),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn delete_removes_row_and_shows_notice() {
        let store = two_users();
        let mut page = UsersPage::new(store.clone());
        page.activate(None).await.unwrap();
        assert_eq!(page.state().data().len(), 2);

        page.delete(&UserId::new("1")).await.unwrap();

        let ids: Vec<_> = page.state().data().iter().map(User::id_text).collect();
        assert_eq!(ids, ["2"]);
        assert_eq!(page.state().phase(), Phase::Ready);
        assert_eq!(page.notice().as_deref(), Some(USER_DELETED));

        tokio::time::sleep(Duration::from_millis(3_050)).await;
        assert_eq!(page.notice(), None);
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_and_reports() {
        let store = two_users();
        let mut page = UsersPage::new(store.clone());
        page.activate(None).await.unwrap();

        store.fail_with(StoreError::Status {
            status: 500,
            message: Some("database offline".to_string()),
        });
        page.delete(&UserId::new("1")).await.unwrap();

        assert_eq!(page.state().phase(), Phase::Failed);
        assert_eq!(page.state().error(), Some("database offline"));
        assert_eq!(page.state().data().len(), 2);
        assert_eq!(page.notice(), None);
        assert_eq!(store.records().len(), 2);
    }

    #[tokio::test]
    async fn list_failure() {
        let store = two_users();
        store.fail_with(StoreError::Timeout);
        let mut page = UsersPage::new(store);
        page.activate(None).await.unwrap();

        assert_eq!(page.state().phase(), Phase::Failed);
        assert_eq!(page.state().error(), Some("Request timed out"));
        assert!(page.state().data().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn incoming_notice_is_shown_then_cleared() {
        let mut page = UsersPage::new(two_users());
        page.activate(Some("User created successfully!".to_string()))
            .await
            .unwrap();
        assert_eq!(page.notice().as_deref(), Some("User created successfully!"));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(page.notice(), None);
    }

    #[test]
    fn actions_navigate() {
        let page = UsersPage::new(two_users());
        assert_eq!(page.edit(UserId::new("2")).to.path(), "/edit/2");
        assert_eq!(page.add_new().to, Route::Create);
    }
}
