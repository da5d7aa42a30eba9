//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer + length instead of `Vec`,
//! and enums with explicit discriminants. Conversion helpers live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use recipe_core::{
    ApiError, Category, DropReason, HomeController, HttpMethod, PendingRequest, Recipe,
    RecipeClient, SearchController, Settlement, Slot, Ticket,
};

/// Opaque handle to a `RecipeClient`.
pub struct FfiRecipeClient {
    pub(crate) inner: RecipeClient,
}

/// Opaque handle to the home screen's view state.
pub struct FfiHomeController {
    pub(crate) inner: HomeController,
}

/// Opaque handle to the search screen's view state.
pub struct FfiSearchController {
    pub(crate) inner: SearchController,
}

/// Convert a Rust string to an owned C string. Interior NULs are dropped
/// rather than failing the whole conversion.
pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let c = CString::new(s).unwrap_or_else(|e| {
        let mut bytes = e.into_vec();
        bytes.retain(|&b| b != 0);
        CString::new(bytes).unwrap_or_default()
    });
    c.into_raw()
}

/// Convert an array of values into a leaked pointer + length. Empty input
/// yields a null pointer.
pub(crate) fn into_raw_array<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let boxed = items.into_boxed_slice();
    let len = boxed.len() as u32;
    (Box::into_raw(boxed) as *mut T, len)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// An HTTP request described as C-compatible plain data.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: recipe_core::HttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: to_c_string(req.path),
        }))
    }
}

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this after executing a request and passes a
/// pointer to a parse or settle function. The FFI layer reads but does not
/// free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Tickets and settlements
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSlot {
    RandomRecipe = 0,
    Categories = 1,
    Search = 2,
}

/// Identifies one issued request; pass it back unchanged when settling.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FfiTicket {
    pub generation: u64,
    pub slot: FfiSlot,
}

impl From<Ticket> for FfiTicket {
    fn from(t: Ticket) -> Self {
        let slot = match t.slot {
            Slot::RandomRecipe => FfiSlot::RandomRecipe,
            Slot::Categories => FfiSlot::Categories,
            Slot::Search => FfiSlot::Search,
        };
        FfiTicket {
            generation: t.generation,
            slot,
        }
    }
}

impl From<FfiTicket> for Ticket {
    fn from(t: FfiTicket) -> Self {
        let slot = match t.slot {
            FfiSlot::RandomRecipe => Slot::RandomRecipe,
            FfiSlot::Categories => Slot::Categories,
            FfiSlot::Search => Slot::Search,
        };
        Ticket {
            generation: t.generation,
            slot,
        }
    }
}

/// A request handed out by a controller.
#[repr(C)]
pub struct FfiPendingRequest {
    pub ticket: FfiTicket,
    pub request: *mut FfiHttpRequest,
}

impl FfiPendingRequest {
    pub(crate) fn from_core(pending: PendingRequest) -> Self {
        FfiPendingRequest {
            ticket: pending.ticket.into(),
            request: FfiHttpRequest::from_core(pending.request),
        }
    }
}

/// Both requests of a home refresh. The host should run them concurrently.
#[repr(C)]
pub struct FfiHomeFetch {
    pub random: FfiPendingRequest,
    pub categories: FfiPendingRequest,
}

/// What a controller did with a settlement.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSettlement {
    Applied = 0,
    Pending = 1,
    Failed = 2,
    Stale = 3,
    TornDown = 4,
    UnexpectedSlot = 5,
    NullArg = 6,
    Panic = 7,
}

impl From<Settlement> for FfiSettlement {
    fn from(s: Settlement) -> Self {
        match s {
            Settlement::Applied => FfiSettlement::Applied,
            Settlement::Pending => FfiSettlement::Pending,
            Settlement::Failed => FfiSettlement::Failed,
            Settlement::Dropped(DropReason::Stale) => FfiSettlement::Stale,
            Settlement::Dropped(DropReason::TornDown) => FfiSettlement::TornDown,
            Settlement::Dropped(DropReason::UnexpectedSlot) => FfiSettlement::UnexpectedSlot,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiRecipeResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Deserialization = 2,
    Transport = 3,
    Panic = 4,
    NullArg = 5,
}

/// Tag that tells `recipe_free_result` what `FfiRecipeResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Recipe = 1,
    RecipeList = 2,
    CategoryList = 3,
}

/// A recipe exposed to C. `tags` is null when the record has none.
#[repr(C)]
pub struct FfiRecipe {
    pub id: *mut c_char,
    pub name: *mut c_char,
    pub category: *mut c_char,
    pub area: *mut c_char,
    pub instructions: *mut c_char,
    pub thumbnail: *mut c_char,
    pub tags: *mut c_char,
}

impl From<Recipe> for FfiRecipe {
    fn from(r: Recipe) -> Self {
        FfiRecipe {
            id: to_c_string(r.id),
            name: to_c_string(r.name),
            category: to_c_string(r.category),
            area: to_c_string(r.area),
            instructions: to_c_string(r.instructions),
            thumbnail: to_c_string(r.thumbnail),
            tags: r.tags.map_or(std::ptr::null_mut(), |t| to_c_string(t)),
        }
    }
}

#[repr(C)]
pub struct FfiRecipeList {
    pub items: *mut FfiRecipe,
    pub len: u32,
}

#[repr(C)]
pub struct FfiCategory {
    pub id: *mut c_char,
    pub name: *mut c_char,
    pub thumbnail: *mut c_char,
}

impl From<Category> for FfiCategory {
    fn from(c: Category) -> Self {
        FfiCategory {
            id: to_c_string(c.id),
            name: to_c_string(c.name),
            thumbnail: to_c_string(c.thumbnail),
        }
    }
}

#[repr(C)]
pub struct FfiCategoryList {
    pub items: *mut FfiCategory,
    pub len: u32,
}

/// Result envelope for parse operations and state snapshots.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data`
/// points to the payload tagged by `data_tag` (`None` with a null `data`
/// when there is nothing to return, e.g. no random recipe).
/// On failure `error_code` describes the category, `error_message` is a
/// human-readable C string, and `data` is null.
#[repr(C)]
pub struct FfiRecipeResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_tag: FfiDataTag,
    pub data: *mut std::ffi::c_void,
}

impl FfiRecipeResult {
    fn ok(data_tag: FfiDataTag, data: *mut std::ffi::c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiRecipeResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_tag,
            data,
        }))
    }

    fn err(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiRecipeResult {
            error_code,
            error_message: to_c_string(msg),
            http_status,
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    /// Success carrying one recipe, or no payload when `recipe` is `None`.
    pub(crate) fn ok_recipe(recipe: Option<Recipe>) -> *mut Self {
        match recipe {
            Some(r) => {
                let data = Box::into_raw(Box::new(FfiRecipe::from(r)));
                Self::ok(FfiDataTag::Recipe, data as *mut std::ffi::c_void)
            }
            None => Self::ok(FfiDataTag::None, std::ptr::null_mut()),
        }
    }

    pub(crate) fn ok_recipe_list(recipes: Vec<Recipe>) -> *mut Self {
        let (items, len) = into_raw_array(recipes.into_iter().map(FfiRecipe::from).collect());
        let list = Box::into_raw(Box::new(FfiRecipeList { items, len }));
        Self::ok(FfiDataTag::RecipeList, list as *mut std::ffi::c_void)
    }

    pub(crate) fn ok_category_list(categories: Vec<Category>) -> *mut Self {
        let (items, len) = into_raw_array(categories.into_iter().map(FfiCategory::from).collect());
        let list = Box::into_raw(Box::new(FfiCategoryList { items, len }));
        Self::ok(FfiDataTag::CategoryList, list as *mut std::ffi::c_void)
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let msg = err.to_string();
        match err {
            ApiError::HttpError { status, .. } => Self::err(FfiErrorCode::Http, status, msg),
            ApiError::DeserializationError(_) => Self::err(FfiErrorCode::Deserialization, 0, msg),
            ApiError::TransportError(_) => Self::err(FfiErrorCode::Transport, 0, msg),
        }
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::err(FfiErrorCode::NullArg, 0, format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::err(FfiErrorCode::Panic, 0, msg.to_string())
    }
}
