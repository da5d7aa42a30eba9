//! Recipe app core: TheMealDB client, screen view state, navigation.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The mobile shells render;
//! this crate decides what to fetch, what to keep, and what to show.
//!
//! # Design
//! - `RecipeClient` is stateless: it holds only `base_url`. Each endpoint is
//!   split into `build_*` and `parse_*`.
//! - `HomeController` and `SearchController` own one screen's state each.
//!   They hand out ticketed `PendingRequest`s and accept outcomes through
//!   `settle`; only the newest generation is applied and nothing is applied
//!   after `teardown`.
//! - `Navigator` hands records to the detail route by value.
//! - `host::Transport` is an optional blocking driver for Rust hosts.
//! - Types use owned `String` / `Vec` fields to keep FFI mapping simple.

pub mod client;
pub mod config;
pub mod error;
pub mod home;
pub mod host;
pub mod http;
pub mod lifecycle;
pub mod navigation;
pub mod search;
pub mod types;

pub use client::RecipeClient;
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use home::{HomeController, HomeFetch};
pub use host::Transport;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use lifecycle::{CancellationToken, DropReason, PendingRequest, Settlement, Slot, Ticket};
pub use navigation::{AppInfo, DetailView, Navigator, Route, Tab, APP_INFO};
pub use search::SearchController;
pub use types::{Category, CategoriesEnvelope, MealsEnvelope, Recipe};
