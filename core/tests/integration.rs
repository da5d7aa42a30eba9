//! End-to-end flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the controllers over
//! real HTTP using a ureq-backed `Transport`. Validates that request building,
//! response parsing and the controllers' state handling work with the actual
//! server.

use std::net::SocketAddr;

use recipe_core::{
    ApiError, DetailView, HomeController, HttpMethod, HttpRequest, HttpResponse, Navigator,
    RecipeClient, SearchController, Settlement, Transport,
};

/// Executes requests with ureq. Status codes are returned as data so the
/// core decides how to interpret them.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut response = match request.method {
            HttpMethod::Get => self.agent.get(&request.path).call(),
        }
        .map_err(|e| ApiError::TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse::new(status, body))
    }
}

fn start_mock_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr) -> RecipeClient {
    RecipeClient::new(&format!("http://{addr}{}", mock_server::API_PREFIX))
}

#[test]
fn browse_search_and_open_detail() {
    let addr = start_mock_server();
    let transport = UreqTransport::new();
    let mut nav = Navigator::new();

    // Home: featured recipe and categories arrive together.
    let mut home = HomeController::new(client_for(addr));
    assert_eq!(home.load_with(&transport), Some(Settlement::Applied));
    assert!(!home.is_loading());
    let featured = home.featured().cloned().expect("featured recipe");
    assert_eq!(featured.id, "52772");
    let names: Vec<_> = home.categories().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Beef", "Chicken", "Dessert", "Lamb"]);

    // Refresh moves the round-robin "random" pick along.
    assert_eq!(home.load_with(&transport), Some(Settlement::Applied));
    assert_ne!(home.featured().unwrap().id, featured.id);

    // Search: empty query does nothing, "Cake" finds one result.
    let mut search = SearchController::new(client_for(addr));
    assert_eq!(search.search_with(&transport), None);
    search.set_query("Cake");
    assert_eq!(search.search_with(&transport), Some(Settlement::Applied));
    assert_eq!(search.results().len(), 1);
    assert_eq!(search.results()[0].name, "Cake Pie");

    // Reserved characters survive the round trip.
    search.set_query("Apple & Blackberry");
    assert_eq!(search.search_with(&transport), Some(Settlement::Applied));
    assert_eq!(search.results()[0].id, "52893");

    // Unknown dish: empty list, not an error.
    search.set_query("zzz");
    assert_eq!(search.search_with(&transport), Some(Settlement::Applied));
    assert!(search.results().is_empty());
    assert!(search.last_error().is_none());

    // Detail: hand-off by value, rendered without another request.
    search.set_query("Gateau");
    search.search_with(&transport);
    nav.open_detail(search.select(0).unwrap());
    search.teardown();
    let view = DetailView::from_route(nav.current()).unwrap();
    assert_eq!(view.title, "Chocolate Gateau");
    assert_eq!(view.category, "Dessert");
    assert_eq!(view.area, "French");
    assert_eq!(view.instructions, "Prepare the Chocolate Gateau and serve.");
}

#[test]
fn unreachable_server_clears_loading() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let transport = UreqTransport::new();

    let mut home = HomeController::new(client_for(addr));
    assert_eq!(home.load_with(&transport), Some(Settlement::Failed));
    assert!(!home.is_loading());
    assert!(home.featured().is_none());
    assert!(matches!(home.last_error(), Some(ApiError::TransportError(_))));

    let mut search = SearchController::new(client_for(addr));
    search.set_query("Cake");
    assert_eq!(search.search_with(&transport), Some(Settlement::Failed));
    assert!(!search.is_loading());
    assert!(search.results().is_empty());
}

#[test]
fn wrong_path_is_reported_as_http_error() {
    let addr = start_mock_server();
    let transport = UreqTransport::new();

    // No API prefix: every endpoint 404s with an empty body.
    let mut search = SearchController::new(RecipeClient::new(&format!("http://{addr}")));
    search.set_query("Cake");
    assert_eq!(search.search_with(&transport), Some(Settlement::Failed));
    assert!(matches!(
        search.last_error(),
        Some(ApiError::HttpError { status: 404, .. })
    ));
}
