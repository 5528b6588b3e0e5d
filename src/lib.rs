//! Web front-end for a remote users REST API: list, view, create, edit and
//! delete users through four server-rendered pages.

pub mod api;
pub mod config;
pub mod model;
pub mod pages;
pub mod store;
