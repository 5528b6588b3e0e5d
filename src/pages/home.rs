use std::sync::Arc;

use super::{PageBusy, PageState};
use crate::model::User;
use crate::store::UserStore;

/// The landing grid: every user as a card.
pub struct HomePage {
    store: Arc<dyn UserStore>,
    state: PageState<Vec<User>>,
}

impl HomePage {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            state: PageState::new(Vec::new()),
        }
    }

    pub async fn activate(&mut self) -> Result<(), PageBusy> {
        self.state.begin()?;
        match self.store.list().await {
            Ok(users) => self.state.succeed(users),
            Err(error) => self.state.fail_store(&error),
        }
        Ok(())
    }

    pub fn state(&self) -> &PageState<Vec<User>> {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::Phase;
    use crate::store::StoreError;
    use crate::store::fake::{FakeUserStore, sample_user};

    #[tokio::test]
    async fn loads_all_users() {
        let store = Arc::new(FakeUserStore::with_users(vec![
            sample_user("1", "Leanne"),
            sample_user("2", "Ervin"),
        ]));
        let mut page = HomePage::new(store);
        page.activate().await.unwrap();

        assert_eq!(page.state().phase(), Phase::Ready);
        let names: Vec<_> = page.state().data().iter().map(User::name).collect();
        assert_eq!(names, ["Leanne", "Ervin"]);
    }

    #[tokio::test]
    async fn failure_keeps_only_the_message() {
        let store = Arc::new(FakeUserStore::default());
        store.fail_with(StoreError::Network("connection refused".to_string()));
        let mut page = HomePage::new(store);
        page.activate().await.unwrap();

        assert_eq!(page.state().phase(), Phase::Failed);
        assert_eq!(page.state().error(), Some("Network Error: connection refused"));
        assert!(page.state().data().is_empty());
    }
}
