//! Stateless HTTP request builder and response parser for TheMealDB.
//!
//! # Design
//! `RecipeClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round trip.
//!
//! Status codes are secondary: a body that decodes as the expected envelope
//! is accepted whatever the status. Only an undecodable body is an error,
//! reported as `HttpError` when the status was non-2xx so the host sees the
//! upstream failure rather than a misleading parse message.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CategoriesEnvelope, Category, MealsEnvelope, Recipe};

/// Synchronous, stateless client for the recipe API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeClient {
    base_url: String,
}

impl Default for RecipeClient {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl RecipeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_random_recipe(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/random.php", self.base_url))
    }

    pub fn build_list_categories(&self) -> HttpRequest {
        HttpRequest::get(format!("{}/categories.php", self.base_url))
    }

    /// Build a search-by-name request. Returns `None` for an empty query:
    /// there is nothing to send and callers keep their previous results.
    pub fn build_search_recipes(&self, query: &str) -> Option<HttpRequest> {
        if query.is_empty() {
            return None;
        }
        let encoded = urlencoding::encode(query);
        Some(HttpRequest::get(format!("{}/search.php?s={encoded}", self.base_url)))
    }

    /// First element of `meals`, or `None` when the list is empty or absent.
    pub fn parse_random_recipe(&self, response: HttpResponse) -> Result<Option<Recipe>, ApiError> {
        let envelope = self.decode_meals(&response)?;
        Ok(envelope.meals.and_then(|meals| meals.into_iter().next()))
    }

    pub fn parse_list_categories(&self, response: HttpResponse) -> Result<Vec<Category>, ApiError> {
        let envelope = self.decode_categories(&response)?;
        Ok(envelope.categories.unwrap_or_default())
    }

    pub fn parse_search_recipes(&self, response: HttpResponse) -> Result<Vec<Recipe>, ApiError> {
        let envelope = self.decode_meals(&response)?;
        Ok(envelope.meals.unwrap_or_default())
    }

    /// Raw `meals` envelope; keeps an absent or null field apart from `[]`.
    pub(crate) fn decode_meals(&self, response: &HttpResponse) -> Result<MealsEnvelope, ApiError> {
        decode(response)
    }

    pub(crate) fn decode_categories(&self, response: &HttpResponse) -> Result<CategoriesEnvelope, ApiError> {
        decode(response)
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    match serde_json::from_str(&response.body) {
        Ok(value) => {
            if !response.is_success() {
                debug!(status = response.status, "accepting decodable body with non-2xx status");
            }
            Ok(value)
        }
        Err(_) if !response.is_success() => Err(ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
        }),
        Err(e) => Err(ApiError::DeserializationError(e.to_string())),
    }
}
