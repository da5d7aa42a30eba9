use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Catalog, CategoriesBody, MealsBody, API_PREFIX};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_value(response: axum::response::Response) -> serde_json::Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(path: &str) -> Request<String> {
    Request::builder()
        .uri(format!("{API_PREFIX}{path}"))
        .body(String::new())
        .unwrap()
}

// --- random ---

#[tokio::test]
async fn random_returns_single_meal() {
    let resp = app().oneshot(get("/random.php")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: MealsBody = body_json(resp).await;
    assert_eq!(body.meals.unwrap().len(), 1);
}

#[tokio::test]
async fn random_on_empty_catalog_is_null() {
    let resp = app_with(Catalog::default()).oneshot(get("/random.php")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_value(resp).await;
    assert!(body["meals"].is_null());
}

#[tokio::test]
async fn random_rotates_through_catalog() {
    use tower::Service;

    let mut app = app().into_service();
    let mut seen = Vec::new();
    for _ in 0..2 {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(get("/random.php"))
            .await
            .unwrap();
        let body: MealsBody = body_json(resp).await;
        seen.push(body.meals.unwrap().remove(0).id);
    }
    assert_ne!(seen[0], seen[1]);
}

// --- categories ---

#[tokio::test]
async fn categories_keep_catalog_order() {
    let resp = app().oneshot(get("/categories.php")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: CategoriesBody = body_json(resp).await;
    let names: Vec<_> = body.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Beef", "Chicken", "Dessert", "Lamb"]);
}

// --- search ---

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let resp = app().oneshot(get("/search.php?s=pie")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: MealsBody = body_json(resp).await;
    let names: Vec<_> = body.meals.unwrap().into_iter().map(|m| m.name).collect();
    assert_eq!(names, ["Cake Pie", "Beef and Mustard Pie"]);
}

#[tokio::test]
async fn search_decodes_percent_encoded_query() {
    let resp = app()
        .oneshot(get("/search.php?s=Apple%20%26%20Blackberry"))
        .await
        .unwrap();
    let body: MealsBody = body_json(resp).await;
    assert_eq!(body.meals.unwrap()[0].id, "52893");
}

#[tokio::test]
async fn search_without_match_returns_null_meals() {
    let resp = app().oneshot(get("/search.php?s=zzz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_value(resp).await;
    assert!(body["meals"].is_null());
}

#[tokio::test]
async fn search_without_parameter_returns_null_meals() {
    let resp = app().oneshot(get("/search.php")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_value(resp).await;
    assert!(body["meals"].is_null());
}

// --- routing ---

#[tokio::test]
async fn unknown_endpoint_returns_404() {
    let resp = app().oneshot(get("/lookup.php?i=1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
