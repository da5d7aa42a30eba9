//! Route stack and the detail hand-off.
//!
//! The root route is a tab host (Highlights, Search). Detail and About are
//! pushed on top. A detail route owns its own copy of the selected recipe,
//! so rendering it never needs the list it came from or another request.

use crate::types::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Highlights,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Tabs(Tab),
    Detail(Recipe),
    About,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Tabs(Tab::default())],
        }
    }

    pub fn current(&self) -> &Route {
        // The root is never popped.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Switch tabs. Anything pushed above the tab host is popped first.
    pub fn select_tab(&mut self, tab: Tab) {
        self.stack.truncate(1);
        self.stack[0] = Route::Tabs(tab);
    }

    pub fn open_detail(&mut self, recipe: Recipe) {
        self.stack.push(Route::Detail(recipe));
    }

    pub fn open_about(&mut self) {
        self.stack.push(Route::About);
    }

    /// Pop the top route. Returns `false` when already at the tab host.
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() == 1 {
            return false;
        }
        self.stack.pop();
        true
    }
}

/// Fields the detail screen renders, borrowed from a detail route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailView<'a> {
    pub title: &'a str,
    pub image_url: &'a str,
    pub category: &'a str,
    pub area: &'a str,
    pub instructions: &'a str,
}

impl<'a> DetailView<'a> {
    pub fn from_route(route: &'a Route) -> Option<Self> {
        match route {
            Route::Detail(recipe) => Some(Self::from_recipe(recipe)),
            _ => None,
        }
    }

    pub fn from_recipe(recipe: &'a Recipe) -> Self {
        Self {
            title: &recipe.name,
            image_url: &recipe.thumbnail,
            category: &recipe.category,
            area: &recipe.area,
            instructions: &recipe.instructions,
        }
    }
}

/// Contents of the About route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
}

pub const APP_INFO: AppInfo = AppInfo {
    name: "Chef de Bolso",
    version: env!("CARGO_PKG_VERSION"),
    description: "Recipe browser built on TheMealDB API.",
};
