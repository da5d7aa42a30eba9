//! View state for the home ("Highlights") screen.
//!
//! A refresh issues the random-recipe and category requests as one batch.
//! Both are handed out at once so the host can run them concurrently.
//! Results are staged until the whole batch has settled, then applied
//! together; a failure in either request abandons the batch, keeps the
//! previously held data and clears `loading`. A response whose `meals` or
//! `categories` field is absent or null leaves that value as it was.

use tracing::{debug, warn};

use crate::client::RecipeClient;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::lifecycle::{
    CancellationToken, DropReason, PendingRequest, Sequencer, Settlement, Slot, Ticket,
};
use crate::types::{Category, Recipe};

/// The request pair issued by one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeFetch {
    pub random: PendingRequest,
    pub categories: PendingRequest,
}

#[derive(Debug)]
struct Batch {
    generation: u64,
    random: Option<Update<Option<Recipe>>>,
    categories: Option<Update<Vec<Category>>>,
}

impl Batch {
    fn has_staged(&self, slot: Slot) -> bool {
        match slot {
            Slot::RandomRecipe => self.random.is_some(),
            _ => self.categories.is_some(),
        }
    }
}

/// What a settled response does to one held value.
#[derive(Debug)]
enum Update<T> {
    Keep,
    Replace(T),
}

impl<T> Update<T> {
    fn apply_to(self, held: &mut T) {
        if let Update::Replace(value) = self {
            *held = value;
        }
    }
}

#[derive(Debug)]
pub struct HomeController {
    client: RecipeClient,
    featured: Option<Recipe>,
    categories: Vec<Category>,
    loading: bool,
    last_error: Option<ApiError>,
    sequencer: Sequencer,
    batch: Option<Batch>,
    token: CancellationToken,
}

impl HomeController {
    pub fn new(client: RecipeClient) -> Self {
        Self {
            client,
            featured: None,
            categories: Vec::new(),
            loading: false,
            last_error: None,
            sequencer: Sequencer::default(),
            batch: None,
            token: CancellationToken::new(),
        }
    }

    /// Start a combined fetch. Repeated calls are not de-duplicated; each
    /// supersedes the batch before it. Returns `None` after teardown.
    pub fn refresh(&mut self) -> Option<HomeFetch> {
        if self.token.is_cancelled() {
            debug!("refresh ignored: home screen torn down");
            return None;
        }
        let generation = self.sequencer.issue();
        self.loading = true;
        self.last_error = None;
        self.batch = Some(Batch {
            generation,
            random: None,
            categories: None,
        });
        debug!(generation, "home refresh issued");
        Some(HomeFetch {
            random: PendingRequest {
                ticket: Ticket { generation, slot: Slot::RandomRecipe },
                request: self.client.build_random_recipe(),
            },
            categories: PendingRequest {
                ticket: Ticket { generation, slot: Slot::Categories },
                request: self.client.build_list_categories(),
            },
        })
    }

    /// Feed back the outcome of a request handed out by `refresh`.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<HttpResponse, ApiError>) -> Settlement {
        if self.token.is_cancelled() {
            debug!(?ticket, "settlement dropped: home screen torn down");
            return Settlement::Dropped(DropReason::TornDown);
        }
        if ticket.slot == Slot::Search {
            return Settlement::Dropped(DropReason::UnexpectedSlot);
        }
        let live = self.sequencer.is_latest(ticket.generation)
            && self
                .batch
                .as_ref()
                .is_some_and(|b| b.generation == ticket.generation && !b.has_staged(ticket.slot));
        if !live {
            debug!(?ticket, "settlement dropped: superseded");
            return Settlement::Dropped(DropReason::Stale);
        }

        let parsed = outcome.and_then(|response| match ticket.slot {
            Slot::RandomRecipe => self.client.decode_meals(&response).map(|envelope| {
                Staged::Random(match envelope.meals {
                    Some(meals) => Update::Replace(meals.into_iter().next()),
                    None => Update::Keep,
                })
            }),
            _ => self.client.decode_categories(&response).map(|envelope| {
                Staged::Categories(match envelope.categories {
                    Some(list) => Update::Replace(list),
                    None => Update::Keep,
                })
            }),
        });

        let staged = match parsed {
            Ok(staged) => staged,
            Err(err) => {
                warn!(?ticket, error = %err, "home fetch failed");
                self.batch = None;
                self.loading = false;
                self.last_error = Some(err);
                return Settlement::Failed;
            }
        };

        let Some(batch) = self.batch.as_mut() else {
            return Settlement::Dropped(DropReason::Stale);
        };
        match staged {
            Staged::Random(recipe) => batch.random = Some(recipe),
            Staged::Categories(list) => batch.categories = Some(list),
        }
        if batch.random.is_none() || batch.categories.is_none() {
            return Settlement::Pending;
        }

        if let Some(Batch {
            random: Some(recipe),
            categories: Some(list),
            ..
        }) = self.batch.take()
        {
            recipe.apply_to(&mut self.featured);
            list.apply_to(&mut self.categories);
        }
        self.loading = false;
        Settlement::Applied
    }

    /// Signal the lifetime token. Late settlements are dropped from now on.
    pub fn teardown(&mut self) {
        self.token.cancel();
        self.batch = None;
        self.loading = false;
    }

    pub fn is_torn_down(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Never true once the lifetime token has been cancelled, whether by
    /// `teardown` or by a host-held clone.
    pub fn is_loading(&self) -> bool {
        self.loading && !self.token.is_cancelled()
    }

    pub fn featured(&self) -> Option<&Recipe> {
        self.featured.as_ref()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Copy of the featured recipe for the detail route.
    pub fn select_featured(&self) -> Option<Recipe> {
        self.featured.clone()
    }

    pub fn client(&self) -> &RecipeClient {
        &self.client
    }
}

enum Staged {
    Random(Update<Option<Recipe>>),
    Categories(Update<Vec<Category>>),
}
