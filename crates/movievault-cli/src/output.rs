use clap::ValueEnum;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, Table};
use movievault_core::TitleDetails;
use movievault_models::{MovieRecord, MovieStatus, SearchCandidate};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "success",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "info",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "warning",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    /// The collection as a table, or as a JSON array of records with ids
    pub fn movies(&self, movies: &[MovieRecord]) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                if movies.is_empty() {
                    println!("No movies yet. Add one with 'movievault add' or 'movievault import'.");
                    return;
                }
                println!("{}", movie_table(movies));
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let records: Vec<serde_json::Value> = movies.iter().map(movie_json).collect();
                self.json(&json!({ "type": "movies", "movies": records }));
            }
        }
    }

    /// Numbered search results
    pub fn candidates(&self, candidates: &[SearchCandidate]) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                let mut table = Table::new();
                table.set_header(vec![
                    Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
                    Cell::new("IMDb").add_attribute(comfy_table::Attribute::Bold),
                ]);
                for (index, candidate) in candidates.iter().enumerate() {
                    table.add_row(vec![
                        Cell::new(index + 1),
                        Cell::new(&candidate.title),
                        Cell::new(candidate.year.as_deref().unwrap_or("")),
                        Cell::new(&candidate.imdb_id),
                    ]);
                }
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                println!("{}", table);
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json(&json!({ "type": "search_results", "results": candidates }));
            }
        }
    }

    /// Details of one looked-up title
    pub fn title(&self, details: &TitleDetails) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                let mut table = Table::new();
                for (label, value) in detail_rows(details) {
                    table.add_row(vec![Cell::new(label).add_attribute(comfy_table::Attribute::Bold), Cell::new(value)]);
                }
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
                println!("{}", table);
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json(&json!({
                    "type": "title",
                    "title": details.candidate,
                    "runtime": details.runtime,
                    "genre": details.genre,
                    "director": details.director,
                    "plot": details.plot,
                }));
            }
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }
}

fn movie_table(movies: &[MovieRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Status").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Rating").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Review").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Added").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Updated").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Id").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for movie in movies {
        let status = match movie.status {
            MovieStatus::Watched => Cell::new("Watched").fg(Color::Green),
            MovieStatus::Watchlist => Cell::new("Watchlist").fg(Color::Cyan),
        };
        table.add_row(vec![
            Cell::new(&movie.title),
            status,
            Cell::new(movie.rating.map(|r| r.to_string()).unwrap_or_default()),
            Cell::new(movie.review.as_deref().map(truncate).unwrap_or_default()),
            Cell::new(short_date(movie.created_at_utc())),
            Cell::new(short_date(movie.updated_at_utc())),
            Cell::new(movie.id.as_str()).fg(Color::DarkGrey),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn movie_json(movie: &MovieRecord) -> serde_json::Value {
    let mut value = serde_json::to_value(movie).unwrap_or_default();
    if let Some(map) = value.as_object_mut() {
        map.insert("id".to_string(), json!(movie.id));
    }
    value
}

/// Label/value pairs for the fields the provider actually filled in
fn detail_rows(details: &TitleDetails) -> Vec<(&'static str, String)> {
    let candidate = &details.candidate;
    let mut rows = vec![("Title", candidate.title.clone())];
    let optional = [
        ("Year", &candidate.year),
        ("Runtime", &details.runtime),
        ("Genre", &details.genre),
        ("Director", &details.director),
        ("Plot", &details.plot),
        ("Poster", &candidate.poster_url),
    ];
    rows.extend(optional.into_iter().filter_map(|(label, value)| value.clone().map(|v| (label, v))));
    rows.push(("IMDb", candidate.imdb_id.clone()));
    rows
}

fn short_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn truncate(review: &str) -> String {
    const MAX: usize = 60;
    if review.chars().count() <= MAX {
        review.to_string()
    } else {
        let cut: String = review.chars().take(MAX - 1).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movievault_models::{MovieId, Rating};

    fn record() -> MovieRecord {
        MovieRecord {
            id: MovieId::new("abc"),
            title: "Heat".into(),
            status: MovieStatus::Watched,
            rating: Some(Rating::new(8).unwrap()),
            review: None,
            poster_url: None,
            imdb_id: Some("tt0113277".into()),
            created_at: 1,
            updated_at: 2,
        }
    }

    #[test]
    fn test_movie_json_includes_id() {
        let value = movie_json(&record());
        assert_eq!(value["id"], "abc");
        assert_eq!(value["rating"], 8);
        assert_eq!(value["imdbId"], "tt0113277");
        assert!(value.get("review").is_none());
    }

    #[test]
    fn test_detail_rows_skip_missing_fields() {
        let details = TitleDetails {
            candidate: SearchCandidate {
                title: "Heat".into(),
                year: Some("1995".into()),
                imdb_id: "tt0113277".into(),
                poster_url: None,
            },
            runtime: Some("170 min".into()),
            genre: None,
            director: Some("Michael Mann".into()),
            plot: None,
        };
        let labels: Vec<&str> = detail_rows(&details).into_iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Title", "Year", "Runtime", "Director", "IMDb"]);
    }

    #[test]
    fn test_short_date() {
        let movie = MovieRecord {
            created_at: 1_700_000_000_000,
            ..record()
        };
        assert_eq!(short_date(movie.created_at_utc()), "2023-11-14");
        assert_eq!(short_date(None), "");
    }

    #[test]
    fn test_truncate_long_review() {
        let long = "x".repeat(100);
        assert_eq!(truncate(&long).chars().count(), 60);
        assert_eq!(truncate("short"), "short");
    }
}
