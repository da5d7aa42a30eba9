//! C-ABI wrapper around `recipe-core`.
//!
//! # Overview
//! Exposes the recipe client and both screen controllers through
//! `extern "C"` functions so the mobile shells can build requests, execute
//! them with their own networking stack, and feed the responses back.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Client functions mirror the core `build_*` / `parse_*` API 1:1.
//! - Controllers hand out `FfiPendingRequest`s carrying an `FfiTicket`; the
//!   host passes the ticket back to `*_settle` with the response, or with a
//!   null response and an error message when the round trip failed.
//! - A single `FfiRecipeResult` envelope with `FfiDataTag` + `void* data`
//!   carries parse results and state snapshots.
//! - The C caller owns all returned pointers and must release them with the
//!   matching `recipe_free_*` function.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use recipe_core::{
    ApiError, ClientConfig, HomeController, HttpResponse, RecipeClient, SearchController,
};
use tracing_subscriber::EnvFilter;

use types::*;

/// Read a borrowed C string. Invalid UTF-8 reads as empty, like a missing value.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn read_c_str(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("").to_string()
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Route core log output to stderr using `EnvFilter` directives such as
/// `"recipe_core=debug"`. Null means `"info"`.
///
/// Returns false if a global subscriber was already installed.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_init_logging(filter: *const c_char) -> bool {
    catch_unwind(|| {
        let directives = if filter.is_null() {
            "info".to_string()
        } else {
            unsafe { read_c_str(filter) }
        };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(directives))
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `RecipeClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `recipe_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_client_new(base_url: *const c_char) -> *mut FfiRecipeClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { read_c_str(base_url) };
        let client = RecipeClient::new(&url);
        Box::into_raw(Box::new(FfiRecipeClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client from the environment (`MEALDB_BASE_URL`), falling back
/// to the public API.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_client_new_default() -> *mut FfiRecipeClient {
    catch_unwind(|| {
        let client = RecipeClient::from_config(&ClientConfig::from_env());
        Box::into_raw(Box::new(FfiRecipeClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `recipe_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_client_free(client: *mut FfiRecipeClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the random-recipe request. Returns null if `client` is null.
/// The caller must free the returned pointer with `recipe_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_build_random_recipe(client: *const FfiRecipeClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_random_recipe())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the category-list request. Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_build_list_categories(client: *const FfiRecipeClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_categories())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build a search-by-name request.
///
/// Returns null if `client` or `query` is null, or if `query` is empty
/// (nothing should be sent).
#[unsafe(no_mangle)]
pub extern "C" fn recipe_build_search_recipes(
    client: *const FfiRecipeClient,
    query: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || query.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let query = unsafe { read_c_str(query) };
        match client.inner.build_search_recipes(&query) {
            Some(req) => FfiHttpRequest::from_core(req),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// read as an empty string.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = unsafe { read_c_str(resp.body) };
    HttpResponse::new(resp.status, body)
}

/// Shared null checks and error mapping for the three parse functions.
fn parse_with<F>(
    client: *const FfiRecipeClient,
    response: *const FfiHttpResponse,
    parse: F,
) -> *mut FfiRecipeResult
where
    F: FnOnce(&RecipeClient, HttpResponse) -> Result<*mut FfiRecipeResult, ApiError>,
{
    if client.is_null() {
        return FfiRecipeResult::null_arg("client");
    }
    if response.is_null() {
        return FfiRecipeResult::null_arg("response");
    }
    let client = unsafe { &*client };
    let resp = unsafe { &*response };
    match parse(&client.inner, ffi_response_to_core(resp)) {
        Ok(result) => result,
        Err(e) => FfiRecipeResult::from_error(e),
    }
}

/// Parse a random-recipe response.
///
/// On success `data_tag` is `Recipe`, or `None` when the API returned no meal.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_parse_random_recipe(
    client: *const FfiRecipeClient,
    response: *const FfiHttpResponse,
) -> *mut FfiRecipeResult {
    catch_unwind(|| {
        parse_with(client, response, |c, r| {
            c.parse_random_recipe(r).map(FfiRecipeResult::ok_recipe)
        })
    })
    .unwrap_or_else(|_| FfiRecipeResult::panic("panic in recipe_parse_random_recipe"))
}

/// Parse a category-list response. On success `data_tag` is `CategoryList`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_parse_list_categories(
    client: *const FfiRecipeClient,
    response: *const FfiHttpResponse,
) -> *mut FfiRecipeResult {
    catch_unwind(|| {
        parse_with(client, response, |c, r| {
            c.parse_list_categories(r).map(FfiRecipeResult::ok_category_list)
        })
    })
    .unwrap_or_else(|_| FfiRecipeResult::panic("panic in recipe_parse_list_categories"))
}

/// Parse a search response. On success `data_tag` is `RecipeList`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_parse_search_recipes(
    client: *const FfiRecipeClient,
    response: *const FfiHttpResponse,
) -> *mut FfiRecipeResult {
    catch_unwind(|| {
        parse_with(client, response, |c, r| {
            c.parse_search_recipes(r).map(FfiRecipeResult::ok_recipe_list)
        })
    })
    .unwrap_or_else(|_| FfiRecipeResult::panic("panic in recipe_parse_search_recipes"))
}

// ---------------------------------------------------------------------------
// Controllers: shared helpers
// ---------------------------------------------------------------------------

/// Turn the host's settle arguments into a round-trip outcome. A null
/// `response` means the round trip failed; `transport_error` (optional)
/// explains why.
fn settle_outcome(
    response: *const FfiHttpResponse,
    transport_error: *const c_char,
) -> Result<HttpResponse, ApiError> {
    if response.is_null() {
        let msg = unsafe { read_c_str(transport_error) };
        let msg = if msg.is_empty() { "request failed".to_string() } else { msg };
        return Err(ApiError::TransportError(msg));
    }
    Ok(ffi_response_to_core(unsafe { &*response }))
}

fn last_error_string(err: Option<&ApiError>) -> *mut c_char {
    match err {
        Some(e) => to_c_string(e.to_string()),
        None => std::ptr::null_mut(),
    }
}

// ---------------------------------------------------------------------------
// Home controller
// ---------------------------------------------------------------------------

/// Create home screen state using a copy of `client`.
/// Returns null if `client` is null. Free with `recipe_home_free`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_new(client: *const FfiRecipeClient) -> *mut FfiHomeController {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let inner = HomeController::new(client.inner.clone());
        Box::into_raw(Box::new(FfiHomeController { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Tear down and free home screen state. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_free(home: *mut FfiHomeController) {
    if !home.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let mut home = unsafe { Box::from_raw(home) };
            home.inner.teardown();
        }));
    }
}

/// Mark the home screen as unmounted. Later settlements are dropped.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_teardown(home: *mut FfiHomeController) {
    if !home.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &mut *home }.inner.teardown();
        }));
    }
}

/// Start a combined fetch. Returns both requests, or null if `home` is null
/// or torn down. Free with `recipe_free_home_fetch`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_refresh(home: *mut FfiHomeController) -> *mut FfiHomeFetch {
    catch_unwind(AssertUnwindSafe(|| {
        if home.is_null() {
            return std::ptr::null_mut();
        }
        let home = unsafe { &mut *home };
        match home.inner.refresh() {
            Some(fetch) => Box::into_raw(Box::new(FfiHomeFetch {
                random: FfiPendingRequest::from_core(fetch.random),
                categories: FfiPendingRequest::from_core(fetch.categories),
            })),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Settle one home request. Pass a null `response` (and optionally a
/// message in `transport_error`) when the round trip failed.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_settle(
    home: *mut FfiHomeController,
    ticket: FfiTicket,
    response: *const FfiHttpResponse,
    transport_error: *const c_char,
) -> FfiSettlement {
    catch_unwind(AssertUnwindSafe(|| {
        if home.is_null() {
            return FfiSettlement::NullArg;
        }
        let home = unsafe { &mut *home };
        let outcome = settle_outcome(response, transport_error);
        home.inner.settle(ticket.into(), outcome).into()
    }))
    .unwrap_or(FfiSettlement::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_is_loading(home: *const FfiHomeController) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        !home.is_null() && unsafe { &*home }.inner.is_loading()
    }))
    .unwrap_or(false)
}

/// Copy of the featured recipe (`data_tag` `Recipe`, or `None` when there
/// is none yet). This is the value to hand to the detail screen.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_featured(home: *const FfiHomeController) -> *mut FfiRecipeResult {
    catch_unwind(AssertUnwindSafe(|| {
        if home.is_null() {
            return FfiRecipeResult::null_arg("home");
        }
        FfiRecipeResult::ok_recipe(unsafe { &*home }.inner.select_featured())
    }))
    .unwrap_or_else(|_| FfiRecipeResult::panic("panic in recipe_home_featured"))
}

/// Copy of the held category list (`data_tag` `CategoryList`).
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_categories(home: *const FfiHomeController) -> *mut FfiRecipeResult {
    catch_unwind(AssertUnwindSafe(|| {
        if home.is_null() {
            return FfiRecipeResult::null_arg("home");
        }
        let categories = unsafe { &*home }.inner.categories().to_vec();
        FfiRecipeResult::ok_category_list(categories)
    }))
    .unwrap_or_else(|_| FfiRecipeResult::panic("panic in recipe_home_categories"))
}

/// Message of the last failed fetch, or null. Free with `recipe_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_home_last_error(home: *const FfiHomeController) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if home.is_null() {
            return std::ptr::null_mut();
        }
        last_error_string(unsafe { &*home }.inner.last_error())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Search controller
// ---------------------------------------------------------------------------

/// Create search screen state using a copy of `client`.
/// Returns null if `client` is null. Free with `recipe_search_free`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_new(client: *const FfiRecipeClient) -> *mut FfiSearchController {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let inner = SearchController::new(client.inner.clone());
        Box::into_raw(Box::new(FfiSearchController { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Tear down and free search screen state. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_free(search: *mut FfiSearchController) {
    if !search.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let mut search = unsafe { Box::from_raw(search) };
            search.inner.teardown();
        }));
    }
}

/// Mark the search screen as unmounted. Later settlements are dropped.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_teardown(search: *mut FfiSearchController) {
    if !search.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &mut *search }.inner.teardown();
        }));
    }
}

/// Replace the query text. Null clears it.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_set_query(search: *mut FfiSearchController, query: *const c_char) {
    if !search.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let query = unsafe { read_c_str(query) };
            unsafe { &mut *search }.inner.set_query(query);
        }));
    }
}

/// Issue a search for the current query.
///
/// Returns null when nothing was issued: empty query, torn down, or null
/// `search`. Free with `recipe_free_pending`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_perform(search: *mut FfiSearchController) -> *mut FfiPendingRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if search.is_null() {
            return std::ptr::null_mut();
        }
        let search = unsafe { &mut *search };
        match search.inner.perform_search() {
            Some(pending) => Box::into_raw(Box::new(FfiPendingRequest::from_core(pending))),
            None => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Settle a search request. Pass a null `response` (and optionally a
/// message in `transport_error`) when the round trip failed.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_settle(
    search: *mut FfiSearchController,
    ticket: FfiTicket,
    response: *const FfiHttpResponse,
    transport_error: *const c_char,
) -> FfiSettlement {
    catch_unwind(AssertUnwindSafe(|| {
        if search.is_null() {
            return FfiSettlement::NullArg;
        }
        let search = unsafe { &mut *search };
        let outcome = settle_outcome(response, transport_error);
        search.inner.settle(ticket.into(), outcome).into()
    }))
    .unwrap_or(FfiSettlement::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_is_loading(search: *const FfiSearchController) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        !search.is_null() && unsafe { &*search }.inner.is_loading()
    }))
    .unwrap_or(false)
}

/// Copy of the held results (`data_tag` `RecipeList`).
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_results(search: *const FfiSearchController) -> *mut FfiRecipeResult {
    catch_unwind(AssertUnwindSafe(|| {
        if search.is_null() {
            return FfiRecipeResult::null_arg("search");
        }
        let results = unsafe { &*search }.inner.results().to_vec();
        FfiRecipeResult::ok_recipe_list(results)
    }))
    .unwrap_or_else(|_| FfiRecipeResult::panic("panic in recipe_search_results"))
}

/// Copy of the result at `index` for the detail screen (`data_tag` `Recipe`,
/// or `None` when `index` is out of range).
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_select(
    search: *const FfiSearchController,
    index: u32,
) -> *mut FfiRecipeResult {
    catch_unwind(AssertUnwindSafe(|| {
        if search.is_null() {
            return FfiRecipeResult::null_arg("search");
        }
        FfiRecipeResult::ok_recipe(unsafe { &*search }.inner.select(index as usize))
    }))
    .unwrap_or_else(|_| FfiRecipeResult::panic("panic in recipe_search_select"))
}

/// Message of the last failed search, or null. Free with `recipe_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_search_last_error(search: *const FfiSearchController) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if search.is_null() {
            return std::ptr::null_mut();
        }
        last_error_string(unsafe { &*search }.inner.last_error())
    }))
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Reclaim an array leaked by `types::into_raw_array`.
///
/// # Safety
/// `ptr`/`len` must come from `into_raw_array` and not have been freed.
unsafe fn take_array<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    unsafe { Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len as usize)) }.into_vec()
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

fn free_request_fields(req: &FfiHttpRequest) {
    free_c_string(req.path);
}

/// Free the C-string fields of an `FfiRecipe` (but not the struct itself).
fn free_ffi_recipe_fields(recipe: &FfiRecipe) {
    free_c_string(recipe.id);
    free_c_string(recipe.name);
    free_c_string(recipe.category);
    free_c_string(recipe.area);
    free_c_string(recipe.instructions);
    free_c_string(recipe.thumbnail);
    free_c_string(recipe.tags);
}

fn free_ffi_category_fields(category: &FfiCategory) {
    free_c_string(category.id);
    free_c_string(category.name);
    free_c_string(category.thumbnail);
}

/// Free an `FfiHttpRequest` returned by any `recipe_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_request_fields(&req);
    });
}

/// Free an `FfiPendingRequest` returned by `recipe_search_perform`,
/// including its request. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_free_pending(pending: *mut FfiPendingRequest) {
    if pending.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let pending = unsafe { Box::from_raw(pending) };
        recipe_free_request(pending.request);
    });
}

/// Free an `FfiHomeFetch` returned by `recipe_home_refresh`, including both
/// requests. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_free_home_fetch(fetch: *mut FfiHomeFetch) {
    if fetch.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let fetch = unsafe { Box::from_raw(fetch) };
        recipe_free_request(fetch.random.request);
        recipe_free_request(fetch.categories.request);
    });
}

/// Free an `FfiRecipeResult`. Safe to call with null. Uses `data_tag` to
/// determine what `data` points to.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_free_result(result: *mut FfiRecipeResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Recipe => {
                let recipe = unsafe { Box::from_raw(result.data as *mut FfiRecipe) };
                free_ffi_recipe_fields(&recipe);
            }
            FfiDataTag::RecipeList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiRecipeList) };
                for item in unsafe { take_array(list.items, list.len) } {
                    free_ffi_recipe_fields(&item);
                }
            }
            FfiDataTag::CategoryList => {
                let list = unsafe { Box::from_raw(result.data as *mut FfiCategoryList) };
                for item in unsafe { take_array(list.items, list.len) } {
                    free_ffi_category_fields(&item);
                }
            }
            FfiDataTag::None => {}
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn recipe_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
