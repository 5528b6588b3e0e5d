//! Server-side HTML for the four pages and the shared chrome.

use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::model::{User, lookup_text};
use crate::pages::{CreatePage, EditPage, HomePage, Phase, UsersPage, notice::NOTICE_TTL};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn disabled(flag: bool) -> &'static str {
    if flag { " disabled" } else { "" }
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css">
</head>
<body>
{navbar}
{body}
{footer}
</body>
</html>
"#,
        title = escape(title),
        navbar = navbar(),
        footer = footer(Utc::now().year()),
    )
}

fn navbar() -> &'static str {
    r#"<nav class="navbar navbar-expand-lg bg-body-tertiary">
<div class="container-fluid">
<a class="navbar-brand" href="/">CRUD APP</a>
<ul class="navbar-nav flex-row gap-3">
<li class="nav-item"><a class="nav-link" href="/">Home</a></li>
<li class="nav-item"><a class="nav-link" href="/users">Users</a></li>
<li class="nav-item"><a class="nav-link" href="/create">Create</a></li>
</ul>
</div>
</nav>"#
}

fn footer(year: i32) -> String {
    format!(
        r#"<footer class="bg-secondary text-white py-4">
<div class="container"><div class="text-center pt-3"><p class="small mb-0">&copy; {year}. All rights reserved.</p></div></div>
</footer>"#
    )
}

pub fn loading() -> String {
    r#"<div class="text-center mt-5">Loading...</div>"#.to_string()
}

pub fn error_only(message: &str) -> String {
    format!(
        r#"<div class="text-center mt-5 text-danger">Error: {}</div>"#,
        escape(message)
    )
}

pub fn not_found(path: &str) -> String {
    format!(
        r#"<div class="text-center mt-5">No page at {}</div>"#,
        escape(path)
    )
}

pub fn home(page: &HomePage) -> String {
    let state = page.state();
    match state.phase() {
        Phase::Loading => return loading(),
        Phase::Failed => return error_only(state.error().unwrap_or_default()),
        Phase::Idle | Phase::Ready => {}
    }

    let cards: String = state.data().iter().map(user_card).collect();
    format!(r#"<div class="row row-cols-1 row-cols-md-2 g-4">{cards}</div>"#)
}

fn user_card(user: &User) -> String {
    format!(
        r#"<div class="col"><div class="card">
<div class="card-header"><h2>{name}</h2><h5 class="text-muted">@{username}</h5></div>
<div class="card-body">
<h5 class="card-title">Contact Information</h5>
<p class="card-text">Email: {email}<br>Phone: {phone}<br>Website: {website}</p>
<h5 class="card-title">Address</h5>
<p class="card-text">{street}, {suite}<br>{city}, {zipcode}<br>Coordinates: {lat}, {lng}</p>
<h5 class="card-title">Company</h5>
<p class="card-text">{company}<br><small class="text-muted">{catch_phrase}<br>{bs}</small></p>
</div></div></div>"#,
        name = escape(user.name()),
        username = escape(user.username()),
        email = escape(user.email()),
        phone = escape(user.phone()),
        website = escape(user.website()),
        street = escape(user.street()),
        suite = escape(user.suite()),
        city = escape(user.city()),
        zipcode = escape(user.zipcode()),
        lat = escape(user.lat()),
        lng = escape(user.lng()),
        company = escape(user.company_name()),
        catch_phrase = escape(user.catch_phrase()),
        bs = escape(user.bs()),
    )
}

fn notice(message: &str) -> String {
    let ttl_ms = NOTICE_TTL.as_millis();
    format!(
        r#"<div id="notice" class="alert alert-success" role="alert" data-dismiss-after="{ttl_ms}">{}</div>
<script>setTimeout(function () {{ var n = document.getElementById("notice"); if (n) n.remove(); }}, {ttl_ms});</script>"#,
        escape(message)
    )
}

pub fn users(page: &UsersPage) -> String {
    let state = page.state();
    match state.phase() {
        Phase::Loading => return loading(),
        Phase::Failed => return error_only(state.error().unwrap_or_default()),
        Phase::Idle | Phase::Ready => {}
    }

    let rows: String = state.data().iter().map(user_row).collect();
    let notice = page.notice().map(|m| notice(&m)).unwrap_or_default();
    format!(
        r#"<div class="container mt-4">
{notice}
<div class="card shadow">
<div class="card-header bg-primary text-white"><h2 class="mb-0">User Directory</h2></div>
<div class="card-body p-0"><div class="table-responsive">
<table class="table table-hover mb-0">
<thead class="bg-light"><tr><th scope="col">ID</th><th scope="col">Name</th><th scope="col">Contact</th><th scope="col">Address</th><th scope="col">Company</th><th scope="col">Actions</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</div></div>
</div>
<a class="btn btn-primary mt-4" href="/create">Add New User</a>
</div>"#
    )
}

fn user_row(user: &User) -> String {
    let id = escape(user.id_text());
    format!(
        r#"<tr data-user-id="{id}">
<td>{id}</td>
<td><div><strong>{name}</strong><div class="text-muted">@{username}</div></div></td>
<td><div><div>{email}</div><div>{phone}</div><div><a href="https://{website}" target="_blank" rel="noopener noreferrer">{website}</a></div></div></td>
<td><div><div>{street}, {suite}</div><div>{city}, {zipcode}</div><div class="text-muted">Lat: {lat}, Lng: {lng}</div></div></td>
<td><div><strong>{company}</strong><div class="text-muted">{catch_phrase}</div><div class="text-muted">{bs}</div></div></td>
<td><div class="btn-group" role="group">
<a class="btn btn-warning btn-sm" href="/edit/{id}">Edit</a>
<form method="post" action="/users/{id}/delete"><button type="submit" class="btn btn-danger btn-sm">Delete</button></form>
</div></td>
</tr>
"#,
        name = escape(user.name()),
        username = escape(user.username()),
        email = escape(user.email()),
        phone = escape(user.phone()),
        website = escape(user.website()),
        street = escape(user.street()),
        suite = escape(user.suite()),
        city = escape(user.city()),
        zipcode = escape(user.zipcode()),
        lat = escape(user.lat()),
        lng = escape(user.lng()),
        company = escape(user.company_name()),
        catch_phrase = escape(user.catch_phrase()),
        bs = escape(user.bs()),
    )
}

struct Field {
    path: &'static str,
    label: &'static str,
    kind: &'static str,
    required: bool,
}

const fn field(path: &'static str, label: &'static str) -> Field {
    Field {
        path,
        label,
        kind: "text",
        required: false,
    }
}

const fn required(path: &'static str, label: &'static str, kind: &'static str) -> Field {
    Field {
        path,
        label,
        kind,
        required: true,
    }
}

enum Block {
    Single(Field),
    Group(&'static str, &'static [Field]),
}

const ADDRESS: &[Field] = &[
    required("address.street", "Street", "text"),
    field("address.suite", "Suite"),
    required("address.city", "City", "text"),
    field("address.zipcode", "Zipcode"),
    field("address.geo.lat", "Latitude"),
    field("address.geo.lng", "Longitude"),
];

const COMPANY: &[Field] = &[
    field("company.name", "Name"),
    field("company.catchPhrase", "Catch Phrase"),
    field("company.bs", "Business Strategy"),
];

/// Inputs are named after the record path they edit.
const FORM: &[Block] = &[
    Block::Single(required("name", "Name", "text")),
    Block::Single(required("username", "Username", "text")),
    Block::Single(required("email", "Email", "email")),
    Block::Group("Address", ADDRESS),
    Block::Single(field("phone", "Phone")),
    Block::Single(field("website", "Website")),
    Block::Group("Company", COMPANY),
];

fn input(record: &Value, field: &Field) -> String {
    format!(
        r#"<div class="mb-3"><label for="{path}" class="form-label">{label}</label><input type="{kind}" class="form-control" id="{path}" name="{path}" value="{value}"{required}></div>"#,
        path = field.path,
        label = field.label,
        kind = field.kind,
        value = escape(&lookup_text(record, field.path)),
        required = if field.required { " required" } else { "" },
    )
}

struct FormView<'a> {
    title: &'a str,
    action: String,
    submit_label: &'a str,
    busy_label: &'a str,
    record: &'a Value,
    error: Option<&'a str>,
    busy: bool,
}

fn user_form(view: FormView<'_>) -> String {
    let mut fields = String::new();
    for block in FORM {
        match block {
            Block::Single(field) => fields.push_str(&input(view.record, field)),
            Block::Group(legend, group) => {
                fields.push_str(&format!(r#"<fieldset class="mb-3"><legend class="fs-5">{legend}</legend>"#));
                for field in group.iter() {
                    fields.push_str(&input(view.record, field));
                }
                fields.push_str("</fieldset>");
            }
        }
    }

    let error = view
        .error
        .map(|message| {
            format!(
                r#"<div class="alert alert-danger" role="alert">Error: {}</div>"#,
                escape(message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="container mt-5"><div class="card shadow">
<div class="card-header bg-primary text-white"><h2 class="mb-0">{title}</h2></div>
<div class="card-body">
{error}
<form method="post" action="{action}">
<fieldset{disabled}>
<div class="mb-3"><label for="id" class="form-label">ID</label><input type="text" class="form-control" id="id" value="{id}" disabled></div>
{fields}
<div class="d-flex justify-content-between">
<button type="submit" class="btn btn-success">{button}</button>
<a class="btn btn-secondary" href="/users">Cancel</a>
</div>
</fieldset>
</form>
</div></div></div>"#,
        title = escape(view.title),
        action = escape(&view.action),
        disabled = disabled(view.busy),
        id = escape(&lookup_text(view.record, "id")),
        button = if view.busy { view.busy_label } else { view.submit_label },
    )
}

pub fn create(page: &CreatePage) -> String {
    let state = page.state();
    user_form(FormView {
        title: "Create User",
        action: "/create".to_string(),
        submit_label: "Create User",
        busy_label: "Creating...",
        record: page.draft(),
        error: state.error(),
        busy: state.is_loading(),
    })
}

/// Without a loaded record the page shows the loading text or the error
/// alone; once loaded, submit errors show inline above the form.
pub fn edit(page: &EditPage) -> String {
    let state = page.state();
    let Some(record) = page.record() else {
        return match state.phase() {
            Phase::Failed => error_only(state.error().unwrap_or_default()),
            Phase::Loading => loading(),
            Phase::Idle | Phase::Ready => String::new(),
        };
    };
    user_form(FormView {
        title: "Edit User",
        action: format!("/edit/{}", page.id()),
        submit_label: "Update User",
        busy_label: "Updating...",
        record,
        error: state.error(),
        busy: state.is_loading(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fake::{FakeUserStore, sample_user};
    use crate::model::UserId;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn layout_has_chrome() {
        let html = layout("Users", "<p>body</p>");
        assert!(html.contains("CRUD APP"));
        assert!(html.contains(r#"href="/create""#));
        assert!(html.contains(&format!("&copy; {}. All rights reserved.", Utc::now().year())));
        assert!(html.contains("<p>body</p>"));
    }

    #[tokio::test]
    async fn users_table_rows() {
        let store = Arc::new(FakeUserStore::with_users(vec![
            sample_user("1", "Leanne"),
            sample_user("2", "<script>"),
        ]));
        let mut page = UsersPage::new(store);
        page.activate(None).await.unwrap();

        let html = users(&page);
        assert_eq!(html.matches("<tr data-user-id=").count(), 2);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Add New User"));
        assert!(html.contains(r#"action="/users/2/delete""#));
        assert!(!html.contains(r#"id="notice""#));
    }

    #[tokio::test]
    async fn edit_form_values_and_inline_error() {
        let mut user = sample_user("7", "Kurtis");
        user["address"] = json!({ "city": "Lebsackbury" });
        let store = Arc::new(FakeUserStore::with_users(vec![user]));
        let mut page = EditPage::new(store.clone(), UserId::new("7"));
        page.activate().await.unwrap();

        let html = edit(&page);
        assert!(html.contains(r#"name="address.city" value="Lebsackbury""#));
        assert!(html.contains(r#"name="address.geo.lat" value="""#));
        assert!(html.contains(r#"id="id" value="7" disabled"#));
        assert!(html.contains("Update User"));

        store.fail_with(crate::store::StoreError::status(500));
        page.submit().await.unwrap();
        let html = edit(&page);
        assert!(html.contains("Error: Request failed with status code 500"));
        assert!(html.contains("<form"));
    }

    #[test]
    fn create_form_is_blank() {
        let page = CreatePage::new(Arc::new(FakeUserStore::default()));
        let html = create(&page);
        assert!(html.contains(r#"name="company.catchPhrase" value="""#));
        assert!(html.contains(r#"name="email" value="" required"#));
        assert!(html.contains("Create User"));
        assert!(!html.contains("alert-danger"));
    }
}
