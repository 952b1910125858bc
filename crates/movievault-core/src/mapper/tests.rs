use super::*;
use serde_json::json;

#[test]
fn test_false_response_is_empty_not_error() {
    let outcome = map_search_response(&json!({
        "Response": "False",
        "Error": "Movie not found!"
    }));

    assert!(outcome.is_empty());
    assert_eq!(outcome.message.as_deref(), Some("Movie not found!"));
    assert_eq!(outcome.skipped, 0);
}

#[test]
fn test_service_failure_collapses_to_empty() {
    let outcome = map_search_response(&json!({
        "Response": "False",
        "Error": "Invalid API key!"
    }));
    assert!(outcome.is_empty());

    assert!(map_search_response(&json!({})).is_empty());
    assert!(map_search_response(&json!("unexpected")).is_empty());
}

#[test]
fn test_maps_provider_fields() {
    let outcome = map_search_response(&json!({
        "Response": "True",
        "totalResults": "2",
        "Search": [
            {
                "Title": "The Matrix",
                "Year": "1999",
                "imdbID": "tt0133093",
                "Type": "movie",
                "Poster": "https://m.media-amazon.com/images/matrix.jpg"
            },
            {
                "Title": "The Matrix Reloaded",
                "Year": "2003",
                "imdbID": "tt0234215",
                "Type": "movie",
                "Poster": "N/A"
            }
        ]
    }));

    assert_eq!(outcome.message, None);
    assert_eq!(
        outcome.candidates,
        vec![
            SearchCandidate {
                title: "The Matrix".into(),
                year: Some("1999".into()),
                imdb_id: "tt0133093".into(),
                poster_url: Some("https://m.media-amazon.com/images/matrix.jpg".into()),
            },
            SearchCandidate {
                title: "The Matrix Reloaded".into(),
                year: Some("2003".into()),
                imdb_id: "tt0234215".into(),
                poster_url: None,
            },
        ]
    );
}

#[test]
fn test_malformed_items_are_skipped() {
    let outcome = map_search_response(&json!({
        "Response": "True",
        "Search": [
            "not an object",
            { "Year": "1999", "imdbID": "tt1" },
            { "Title": "  ", "imdbID": "tt2" },
            { "Title": "No Id" },
            { "Title": "Kept", "imdbID": "tt3" },
            null
        ]
    }));

    assert_eq!(outcome.candidates.len(), 1);
    assert_eq!(outcome.candidates[0].title, "Kept");
    assert_eq!(outcome.candidates[0].year, None);
    assert_eq!(outcome.skipped, 5);
}

#[test]
fn test_optional_fields_never_placeholders() {
    let candidate = map_item(&json!({
        "Title": "Alien",
        "Year": "",
        "imdbID": "tt0078748",
        "Poster": "n/a"
    }))
    .unwrap();

    assert_eq!(candidate.year, None);
    assert_eq!(candidate.poster_url, None);
}

#[test]
fn test_numeric_year_accepted() {
    let candidate = map_item(&json!({ "Title": "Heat", "Year": 1995, "imdbID": "tt0113277" })).unwrap();
    assert_eq!(candidate.year.as_deref(), Some("1995"));
}

#[test]
fn test_success_without_results_array() {
    let outcome = map_search_response(&json!({ "Response": "True" }));
    assert!(outcome.is_empty());
    assert_eq!(outcome.message, None);
}

#[test]
fn test_title_lookup_maps_details() {
    let details = map_title_response(&json!({
        "Title": "The Matrix",
        "Year": "1999",
        "Runtime": "136 min",
        "Genre": "Action, Sci-Fi",
        "Director": "Lana Wachowski, Lilly Wachowski",
        "Plot": "N/A",
        "Poster": "https://img.example/matrix.jpg",
        "imdbID": "tt0133093",
        "Response": "True"
    }))
    .unwrap();

    assert_eq!(details.candidate.imdb_id, "tt0133093");
    assert_eq!(details.candidate.year.as_deref(), Some("1999"));
    assert_eq!(details.runtime.as_deref(), Some("136 min"));
    assert_eq!(details.plot, None);
}

#[test]
fn test_title_lookup_failure_keeps_message() {
    let err = map_title_response(&json!({ "Response": "False", "Error": "Incorrect IMDb ID." })).unwrap_err();
    assert_eq!(err.as_deref(), Some("Incorrect IMDb ID."));

    let err = map_title_response(&json!({ "Response": "True", "Title": "No id" })).unwrap_err();
    assert_eq!(err, None);
}
