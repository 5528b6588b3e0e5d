//! Page controllers and the plumbing they share.
//!
//! Every page walks the same machine: `Idle -> Loading -> Ready | Failed`,
//! and may re-enter `Loading` on the next action. A page owns the data it
//! fetched; nothing is shared between pages.

use thiserror::Error;
use tokio::task::AbortHandle;

use crate::model::UserId;
use crate::store::StoreError;

pub mod create;
pub mod edit;
pub mod home;
pub mod notice;
pub mod users;

pub use create::CreatePage;
pub use edit::EditPage;
pub use home::HomePage;
pub use notice::TransientNotice;
pub use users::UsersPage;

/// True for any path into the store-assigned id, nested ones included.
pub fn targets_id(path: &str) -> bool {
    path.split('.').next() == Some("id")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Raised when an action is triggered while the page is still loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a request is already in flight")]
pub struct PageBusy;

#[derive(Debug, Clone)]
pub struct PageState<T> {
    phase: Phase,
    data: T,
    error: Option<String>,
    upstream_status: Option<u16>,
}

impl<T> PageState<T> {
    pub fn new(data: T) -> Self {
        Self {
            phase: Phase::Idle,
            data,
            error: None,
            upstream_status: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// HTTP status the store answered the last failed request with.
    pub fn upstream_status(&self) -> Option<u16> {
        self.upstream_status
    }

    /// Enters `Loading` and clears the previous error. At most one request
    /// may be in flight per page.
    pub fn begin(&mut self) -> Result<(), PageBusy> {
        if self.is_loading() {
            return Err(PageBusy);
        }
        self.phase = Phase::Loading;
        self.error = None;
        self.upstream_status = None;
        Ok(())
    }

    /// Leaves `Loading` with fresh data.
    pub fn succeed(&mut self, data: T) {
        self.data = data;
        self.phase = Phase::Ready;
    }

    /// Leaves `Loading` keeping the current data.
    pub fn settle(&mut self) {
        self.phase = Phase::Ready;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.phase = Phase::Failed;
    }

    pub fn fail_store(&mut self, error: &StoreError) {
        self.upstream_status = error.status_code();
        self.fail(error.display_message());
    }
}

enum Disposer {
    Task(AbortHandle),
    Callback(Box<dyn FnOnce() + Send + Sync>),
}

/// Cleanup registered while a page is active, run once when it goes away.
#[derive(Default)]
pub struct Lifecycle {
    disposers: Vec<Disposer>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_task(&mut self, handle: AbortHandle) {
        self.disposers.retain(|d| !matches!(d, Disposer::Task(h) if h.is_finished()));
        self.disposers.push(Disposer::Task(handle));
    }

    pub fn register(&mut self, callback: impl FnOnce() + Send + Sync + 'static) {
        self.disposers.push(Disposer::Callback(Box::new(callback)));
    }

    pub fn deactivate(&mut self) {
        for disposer in self.disposers.drain(..) {
            match disposer {
                Disposer::Task(handle) => handle.abort(),
                Disposer::Callback(callback) => callback(),
            }
        }
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Users,
    Create,
    Edit(UserId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Users => "/users".to_string(),
            Self::Create => "/create".to_string(),
            Self::Edit(id) => format!("/edit/{id}"),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Home),
            "/users" => Some(Self::Users),
            "/create" => Some(Self::Create),
            other => other
                .strip_prefix("/edit/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Self::Edit(UserId::new(id))),
        }
    }
}

/// A transition requested by a page, carrying an optional one-shot notice
/// for the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: Route,
    pub notice: Option<String>,
}

impl Navigation {
    pub fn to_users_with(notice: impl Into<String>) -> Self {
        Self {
            to: Route::Users,
            notice: Some(notice.into()),
        }
    }

    /// Hands the notice over; a second call returns `None`.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
