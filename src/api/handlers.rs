//! One handler per page action. Each request mounts a fresh controller, runs
//! it, renders the resulting state and lets the controller go.

use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::api::flash::{self, FlashStore};
use crate::api::server::AppState;
use crate::api::views;
use crate::model::UserId;
use crate::pages::{
    CreatePage, EditPage, HomePage, Navigation, PageBusy, PageState, Phase, UsersPage,
};

/// Posted form fields, keyed by record path.
type Fields = Form<Vec<(String, String)>>;

impl IntoResponse for PageBusy {
    fn into_response(self) -> Response {
        (StatusCode::CONFLICT, self.to_string()).into_response()
    }
}

fn page(status: StatusCode, title: &str, body: String) -> Response {
    (status, Html(views::layout(title, &body))).into_response()
}

/// Status for a page whose content came from a read.
fn read_status<T>(state: &PageState<T>) -> StatusCode {
    match (state.phase(), state.upstream_status()) {
        (Phase::Failed, Some(404)) => StatusCode::NOT_FOUND,
        (Phase::Failed, _) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    }
}

/// Status for a form page after a submit attempt.
fn write_status<T>(state: &PageState<T>) -> StatusCode {
    if state.phase() == Phase::Failed {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    }
}

async fn navigate(mut navigation: Navigation, flash: &FlashStore) -> Response {
    let mut response = Redirect::to(&navigation.to.path()).into_response();
    if let Some(notice) = navigation.take_notice() {
        let token = flash.put(notice).await;
        response
            .headers_mut()
            .insert(header::SET_COOKIE, flash::set_cookie(token));
    }
    response
}

pub async fn home(State(state): State<Arc<AppState>>) -> Result<Response, PageBusy> {
    let mut home = HomePage::new(state.store.clone());
    home.activate().await?;
    Ok(page(read_status(home.state()), "Home", views::home(&home)))
}

pub async fn users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, PageBusy> {
    let token = flash::token_from(&headers);
    let incoming = match token {
        Some(token) => state.flash.take(token).await,
        None => None,
    };

    let mut users = UsersPage::new(state.store.clone());
    users.activate(incoming).await?;
    let mut response = page(read_status(users.state()), "Users", views::users(&users));
    // The page ends with the request; the browser runs the 3 s dismissal.
    users.deactivate();

    if token.is_some() {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, flash::clear_cookie());
    }
    Ok(response)
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, PageBusy> {
    let mut users = UsersPage::new(state.store.clone());
    users.activate(None).await?;
    if users.state().phase() != Phase::Failed {
        users.delete(&UserId::new(id)).await?;
    }
    let notice = users.notice();
    users.deactivate();

    // Redirect so a reload does not repeat the delete.
    match notice {
        Some(notice) if users.state().phase() == Phase::Ready => {
            Ok(navigate(Navigation::to_users_with(notice), &state.flash).await)
        }
        _ => Ok(page(read_status(users.state()), "Users", views::users(&users))),
    }
}

pub async fn create_form(State(state): State<Arc<AppState>>) -> Response {
    let create = CreatePage::new(state.store.clone());
    page(StatusCode::OK, "Create User", views::create(&create))
}

pub async fn create_submit(
    State(state): State<Arc<AppState>>,
    Form(fields): Fields,
) -> Result<Response, PageBusy> {
    let mut create = CreatePage::new(state.store.clone());
    for (path, value) in &fields {
        create.change(path, value)?;
    }

    match create.submit().await? {
        Some(navigation) => Ok(navigate(navigation, &state.flash).await),
        None => {
            warn!(error = create.state().error().unwrap_or_default(), "create failed");
            Ok(page(write_status(create.state()), "Create User", views::create(&create)))
        }
    }
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, PageBusy> {
    let mut edit = EditPage::new(state.store.clone(), UserId::new(id));
    edit.activate().await?;
    Ok(page(read_status(edit.state()), "Edit User", views::edit(&edit)))
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(fields): Fields,
) -> Result<Response, PageBusy> {
    let mut edit = EditPage::new(state.store.clone(), UserId::new(id));
    edit.activate().await?;
    if edit.record().is_none() {
        return Ok(page(read_status(edit.state()), "Edit User", views::edit(&edit)));
    }

    for (path, value) in &fields {
        edit.change(path, value)?;
    }

    match edit.submit().await? {
        Some(navigation) => Ok(navigate(navigation, &state.flash).await),
        None => {
            warn!(id = %edit.id(), error = edit.state().error().unwrap_or_default(), "update failed");
            Ok(page(write_status(edit.state()), "Edit User", views::edit(&edit)))
        }
    }
}

pub async fn not_found(uri: Uri) -> Response {
    page(StatusCode::NOT_FOUND, "Not Found", views::not_found(uri.path()))
}
