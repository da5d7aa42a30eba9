//! Fixture stand-in for TheMealDB, served under `/api/json/v1/1`.
//!
//! - `random.php` walks the catalog round-robin; `{"meals": null}` when empty.
//! - `categories.php` returns the categories in catalog order.
//! - `search.php?s=` matches names case-insensitively by substring;
//!   `{"meals": null}` when nothing matches or `s` is missing.
//!
//! Anything else is a 404 with an empty body.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Path prefix of the public API (`/api/json/v1/<key>`).
pub const API_PREFIX: &str = "/api/json/v1/1";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meal {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strCategory")]
    pub category: String,
    #[serde(rename = "strArea")]
    pub area: String,
    #[serde(rename = "strInstructions")]
    pub instructions: String,
    #[serde(rename = "strMealThumb")]
    pub thumbnail: String,
    #[serde(rename = "strTags")]
    pub tags: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealCategory {
    #[serde(rename = "idCategory")]
    pub id: String,
    #[serde(rename = "strCategory")]
    pub name: String,
    #[serde(rename = "strCategoryThumb")]
    pub thumbnail: String,
    #[serde(rename = "strCategoryDescription")]
    pub description: String,
}

/// `meals` serializes as `null` when empty, like the real API.
#[derive(Debug, Serialize, Deserialize)]
pub struct MealsBody {
    pub meals: Option<Vec<Meal>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesBody {
    pub categories: Vec<MealCategory>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub s: Option<String>,
}

/// Fixture data served by the mock.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub meals: Vec<Meal>,
    pub categories: Vec<MealCategory>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            meals: vec![
                meal("52772", "Teriyaki Chicken Casserole", "Chicken", "Japanese", Some("Meat,Casserole")),
                meal("52893", "Apple & Blackberry Crumble", "Dessert", "British", Some("Pudding")),
                meal("52776", "Chocolate Gateau", "Dessert", "French", None),
                meal("1", "Cake Pie", "Dessert", "British", None),
                meal("52874", "Beef and Mustard Pie", "Beef", "British", Some("Meat,Pie")),
            ],
            categories: vec![
                category("1", "Beef"),
                category("2", "Chicken"),
                category("3", "Dessert"),
                category("4", "Lamb"),
            ],
        }
    }
}

fn meal(id: &str, name: &str, category: &str, area: &str, tags: Option<&str>) -> Meal {
    Meal {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        area: area.to_string(),
        instructions: format!("Prepare the {name} and serve."),
        thumbnail: format!("https://www.themealdb.com/images/media/meals/{id}.jpg"),
        tags: tags.map(str::to_string),
    }
}

fn category(id: &str, name: &str) -> MealCategory {
    MealCategory {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail: format!("https://www.themealdb.com/images/category/{}.png", name.to_lowercase()),
        description: format!("{name} recipes."),
    }
}

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    cursor: Arc<AtomicUsize>,
}

pub fn app() -> Router {
    app_with(Catalog::builtin())
}

pub fn app_with(catalog: Catalog) -> Router {
    let state = AppState {
        catalog: Arc::new(catalog),
        cursor: Arc::new(AtomicUsize::new(0)),
    };
    let api = Router::new()
        .route("/random.php", get(random_meal))
        .route("/categories.php", get(list_categories))
        .route("/search.php", get(search_meals))
        .with_state(state);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Round-robin over the catalog so tests see a predictable "random" meal.
async fn random_meal(State(state): State<AppState>) -> Json<MealsBody> {
    let meals = &state.catalog.meals;
    if meals.is_empty() {
        return Json(MealsBody { meals: None });
    }
    let index = state.cursor.fetch_add(1, Ordering::SeqCst) % meals.len();
    debug!(index, "serving random meal");
    Json(MealsBody {
        meals: Some(vec![meals[index].clone()]),
    })
}

async fn list_categories(State(state): State<AppState>) -> Json<CategoriesBody> {
    Json(CategoriesBody {
        categories: state.catalog.categories.clone(),
    })
}

async fn search_meals(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<MealsBody> {
    let needle = params.s.unwrap_or_default().to_lowercase();
    debug!(query = %needle, "search");
    if needle.is_empty() {
        return Json(MealsBody { meals: None });
    }
    let found: Vec<Meal> = state
        .catalog
        .meals
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(MealsBody {
        meals: (!found.is_empty()).then_some(found),
    })
}
