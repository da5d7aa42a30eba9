//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Expected records are compared as decoded
//! structs, so field order in the fixtures does not matter.

use recipe_core::{ApiError, Category, HttpMethod, HttpRequest, HttpResponse, Recipe, RecipeClient};

const BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

fn client() -> RecipeClient {
    RecipeClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_error(name: &str, err: ApiError, expected: &str) {
    match expected {
        "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError, got {err}"),
        "DeserializationError" => assert!(
            matches!(err, ApiError::DeserializationError(_)),
            "{name}: expected DeserializationError, got {err}"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Random
// ---------------------------------------------------------------------------

#[test]
fn random_test_vectors() {
    let raw = include_str!("../../test-vectors/random.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        assert_request(name, &c.build_random_recipe(), &case["expected_request"]);

        let result = c.parse_random_recipe(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected: Option<Recipe> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[test]
fn categories_test_vectors() {
    let raw = include_str!("../../test-vectors/categories.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        assert_request(name, &c.build_list_categories(), &case["expected_request"]);

        let result = c.parse_list_categories(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected: Vec<Category> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn search_test_vectors() {
    let raw = include_str!("../../test-vectors/search.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let query = case["input"].as_str().unwrap();

        let built = c.build_search_recipes(query);
        if case["expected_request"].is_null() {
            assert!(built.is_none(), "{name}: expected no request");
            continue;
        }
        assert_request(name, &built.unwrap(), &case["expected_request"]);

        let result = c.parse_search_recipes(simulated_response(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let expected: Vec<Recipe> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
