//! Domain DTOs for TheMealDB API.
//!
//! # Design
//! Records are opaque pass-through values: the wire names (`idMeal`,
//! `strMeal`, ...) are mapped onto plain Rust field names and nothing is
//! validated or derived. The live API returns `null` for some string fields
//! on older entries, so those decode to `""` instead of failing the whole
//! payload. Unknown fields (ingredients, measures, video links) are ignored.
//!
//! The mock server defines its own copies of these shapes; the integration
//! tests catch schema drift between the two crates.

use serde::{Deserialize, Deserializer, Serialize};

/// A single dish as returned by `random.php` and `search.php`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "strCategory", default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(rename = "strArea", default, deserialize_with = "null_as_empty")]
    pub area: String,
    #[serde(rename = "strInstructions", default, deserialize_with = "null_as_empty")]
    pub instructions: String,
    #[serde(rename = "strMealThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
    #[serde(rename = "strTags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

impl Recipe {
    /// Subtitle of the featured card on the home screen.
    pub fn featured_subtitle(&self) -> String {
        format!("{} | {}", self.category, self.area)
    }
}

/// A named grouping of recipes as returned by `categories.php`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "idCategory")]
    pub id: String,
    #[serde(rename = "strCategory", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "strCategoryThumb", default, deserialize_with = "null_as_empty")]
    pub thumbnail: String,
}

/// Top-level body of `random.php` and `search.php`. `meals` is `null` when
/// nothing matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealsEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<Recipe>>,
}

/// Top-level body of `categories.php`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
