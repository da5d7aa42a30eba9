//! View state for the search screen.
//!
//! The query is edited freely; a search only runs when `perform_search` is
//! called. Results are replaced on settlement only, so the previous list
//! stays available while a search is in flight. Every search gets a fresh
//! sequence number and only the newest one may write results, once.

use tracing::{debug, warn};

use crate::client::RecipeClient;
use crate::error::ApiError;
use crate::http::HttpResponse;
use crate::lifecycle::{
    CancellationToken, DropReason, PendingRequest, Sequencer, Settlement, Slot, Ticket,
};
use crate::types::Recipe;

#[derive(Debug)]
pub struct SearchController {
    client: RecipeClient,
    query: String,
    results: Vec<Recipe>,
    loading: bool,
    last_error: Option<ApiError>,
    sequencer: Sequencer,
    in_flight: Option<u64>,
    token: CancellationToken,
}

impl SearchController {
    pub fn new(client: RecipeClient) -> Self {
        Self {
            client,
            query: String::new(),
            results: Vec::new(),
            loading: false,
            last_error: None,
            sequencer: Sequencer::default(),
            in_flight: None,
            token: CancellationToken::new(),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Issue a search for the current query.
    ///
    /// An empty query is a no-op: nothing is issued and `loading`,
    /// `results` and `last_error` are left as they were.
    pub fn perform_search(&mut self) -> Option<PendingRequest> {
        if self.token.is_cancelled() {
            debug!("search ignored: search screen torn down");
            return None;
        }
        let Some(request) = self.client.build_search_recipes(&self.query) else {
            debug!("search skipped: empty query");
            return None;
        };
        let generation = self.sequencer.issue();
        self.in_flight = Some(generation);
        self.loading = true;
        self.last_error = None;
        debug!(generation, query = %self.query, "search issued");
        Some(PendingRequest {
            ticket: Ticket {
                generation,
                slot: Slot::Search,
            },
            request,
        })
    }

    /// Feed back the outcome of a request handed out by `perform_search`.
    pub fn settle(&mut self, ticket: Ticket, outcome: Result<HttpResponse, ApiError>) -> Settlement {
        if self.token.is_cancelled() {
            debug!(?ticket, "settlement dropped: search screen torn down");
            return Settlement::Dropped(DropReason::TornDown);
        }
        if ticket.slot != Slot::Search {
            return Settlement::Dropped(DropReason::UnexpectedSlot);
        }
        if self.in_flight != Some(ticket.generation) {
            debug!(?ticket, "settlement dropped: superseded or already settled");
            return Settlement::Dropped(DropReason::Stale);
        }

        self.in_flight = None;
        self.loading = false;
        match outcome.and_then(|response| self.client.parse_search_recipes(response)) {
            Ok(results) => {
                self.results = results;
                Settlement::Applied
            }
            Err(err) => {
                warn!(?ticket, error = %err, "search failed");
                self.last_error = Some(err);
                Settlement::Failed
            }
        }
    }

    pub fn teardown(&mut self) {
        self.token.cancel();
        self.in_flight = None;
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

    pub fn results(&self) -> &[Recipe] {
        &self.results
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Copy of the result at `index` for the detail route.
    pub fn select(&self, index: usize) -> Option<Recipe> {
        self.results.get(index).cloned()
    }

    pub fn client(&self) -> &RecipeClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAKE_BODY: &str = r#"{"meals":[{"idMeal":"1","strMeal":"Cake Pie","strCategory":"Dessert",
        "strArea":"British","strInstructions":"Bake.","strMealThumb":"https://example.test/1.jpg"}]}"#;
    const PIE_BODY: &str = r#"{"meals":[
        {"idMeal":"7","strMeal":"Apple Pie","strCategory":"Dessert","strArea":"American"},
        {"idMeal":"8","strMeal":"Pork Pie","strCategory":"Pork","strArea":"British"}]}"#;

    fn controller() -> SearchController {
        SearchController::new(RecipeClient::new("http://localhost:3000/api/json/v1/1"))
    }

    fn ok(body: &str) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse::new(200, body))
    }

    #[test]
    fn empty_query_is_a_no_op() {
        let mut search = controller();
        search.set_query("Cake");
        let pending = search.perform_search().unwrap();
        search.settle(pending.ticket, ok(CAKE_BODY));

        search.set_query("");
        assert!(search.perform_search().is_none());
        assert!(!search.is_loading());
        assert_eq!(search.results().len(), 1);
    }

    #[test]
    fn search_applies_results_on_settlement() {
        let mut search = controller();
        search.set_query("Cake");
        let pending = search.perform_search().unwrap();
        assert!(search.is_loading());
        assert!(pending.request.path.ends_with("/search.php?s=Cake"));

        assert_eq!(search.settle(pending.ticket, ok(CAKE_BODY)), Settlement::Applied);
        assert!(!search.is_loading());
        let meals = search.results();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "1");
        assert_eq!(meals[0].name, "Cake Pie");
        assert_eq!(meals[0].area, "British");
    }

    #[test]
    fn previous_results_held_while_in_flight() {
        let mut search = controller();
        search.set_query("Cake");
        let first = search.perform_search().unwrap();
        search.settle(first.ticket, ok(CAKE_BODY));

        search.set_query("Pie");
        let second = search.perform_search().unwrap();
        assert!(search.is_loading());
        assert_eq!(search.results()[0].name, "Cake Pie");
        search.settle(second.ticket, ok(PIE_BODY));
        assert_eq!(search.results().len(), 2);
    }

    #[test]
    fn no_match_clears_results() {
        let mut search = controller();
        search.set_query("Cake");
        let first = search.perform_search().unwrap();
        search.settle(first.ticket, ok(CAKE_BODY));
        search.set_query("zzz");
        let second = search.perform_search().unwrap();
        search.settle(second.ticket, ok(r#"{"meals":null}"#));
        assert!(search.results().is_empty());
        assert!(search.last_error().is_none());
    }

    #[test]
    fn overlapping_searches_keep_newest_result() {
        let mut search = controller();
        search.set_query("Cake");
        let older = search.perform_search().unwrap();
        search.set_query("Pie");
        let newer = search.perform_search().unwrap();

        assert_eq!(search.settle(newer.ticket, ok(PIE_BODY)), Settlement::Applied);
        assert_eq!(
            search.settle(older.ticket, ok(CAKE_BODY)),
            Settlement::Dropped(DropReason::Stale)
        );
        assert_eq!(search.results()[0].name, "Apple Pie");
        assert!(!search.is_loading());
    }

    #[test]
    fn stale_settlement_does_not_clear_loading() {
        let mut search = controller();
        search.set_query("Cake");
        let older = search.perform_search().unwrap();
        search.set_query("Pie");
        let _newer = search.perform_search().unwrap();
        search.settle(older.ticket, ok(CAKE_BODY));
        assert!(search.is_loading());
        assert!(search.results().is_empty());
    }

    #[test]
    fn failure_clears_loading_and_keeps_results() {
        let mut search = controller();
        search.set_query("Cake");
        let first = search.perform_search().unwrap();
        search.settle(first.ticket, ok(CAKE_BODY));

        let second = search.perform_search().unwrap();
        let outcome = Err(ApiError::TransportError("timed out".to_string()));
        assert_eq!(search.settle(second.ticket, outcome), Settlement::Failed);
        assert!(!search.is_loading());
        assert_eq!(search.results().len(), 1);
        assert!(search.last_error().is_some());
    }

    #[test]
    fn repeated_ticket_is_dropped() {
        let mut search = controller();
        search.set_query("Cake");
        let pending = search.perform_search().unwrap();
        assert_eq!(search.settle(pending.ticket, ok(CAKE_BODY)), Settlement::Applied);

        let outcome = Err(ApiError::TransportError("dup".to_string()));
        assert_eq!(
            search.settle(pending.ticket, outcome),
            Settlement::Dropped(DropReason::Stale)
        );
        assert_eq!(
            search.settle(pending.ticket, ok(r#"{"meals":null}"#)),
            Settlement::Dropped(DropReason::Stale)
        );
        assert_eq!(search.results().len(), 1);
        assert!(search.last_error().is_none());
    }

    #[test]
    fn unissued_ticket_is_dropped() {
        let mut search = controller();
        for generation in [0, 1] {
            let ticket = Ticket { generation, slot: Slot::Search };
            assert_eq!(
                search.settle(ticket, ok(CAKE_BODY)),
                Settlement::Dropped(DropReason::Stale)
            );
        }
        assert!(search.results().is_empty());
        assert!(!search.is_loading());
    }

    #[test]
    fn teardown_drops_late_settlement() {
        let mut search = controller();
        search.set_query("Cake");
        let pending = search.perform_search().unwrap();
        search.teardown();
        assert!(!search.is_loading());
        assert_eq!(
            search.settle(pending.ticket, ok(CAKE_BODY)),
            Settlement::Dropped(DropReason::TornDown)
        );
        assert!(search.results().is_empty());
        assert!(search.perform_search().is_none());
    }

    #[test]
    fn home_ticket_is_rejected() {
        let mut search = controller();
        search.set_query("Cake");
        let pending = search.perform_search().unwrap();
        let ticket = Ticket {
            generation: pending.ticket.generation,
            slot: Slot::Categories,
        };
        assert_eq!(
            search.settle(ticket, ok(CAKE_BODY)),
            Settlement::Dropped(DropReason::UnexpectedSlot)
        );
        assert!(search.is_loading());
    }

    #[test]
    fn select_returns_copy_or_none() {
        let mut search = controller();
        search.set_query("Pie");
        let pending = search.perform_search().unwrap();
        search.settle(pending.ticket, ok(PIE_BODY));
        assert_eq!(search.select(1).unwrap().name, "Pork Pie");
        assert!(search.select(2).is_none());
    }
}
