//! OpenLibrary edition to Book mapper
//!
//! Maps the JSON of `/books/{olid}.json` onto the local `book` columns.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::Book;

pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const MISSING_ISBN: &str = "0000000000000";
pub const DEFAULT_RELEASE_YEAR: i32 = 2000;
pub const DEFAULT_LANGUAGE: &str = "en";

const COVERS_BASE: &str = "https://covers.openlibrary.org/b/id";

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(18|19|20)\d{2}\b").unwrap());
static LANGUAGE_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/languages/([a-z]{3})").unwrap());
static NON_ISBN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9Xx]").unwrap());

/// Map an edition document onto a `Book`; every column has a fallback so the mapping never fails
pub fn book_from_edition(edition: &Value, olid: &str) -> Book {
    let title = edition
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let author = edition
        .get("by_statement")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let isbn = first_string(edition, "isbn_13")
        .or_else(|| first_string(edition, "isbn_10"))
        .unwrap_or(MISSING_ISBN);

    let release_year = edition
        .get("publish_date")
        .and_then(Value::as_str)
        .and_then(|d| YEAR_RE.find(d))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_RELEASE_YEAR);

    let publisher = first_string(edition, "publishers").map(String::from);

    let language = edition
        .get("languages")
        .and_then(|l| l.get(0))
        .and_then(|l| l.get("key"))
        .and_then(Value::as_str)
        .and_then(|key| LANGUAGE_KEY_RE.captures(key))
        .and_then(|c| c.get(1))
        .and_then(|code| iso639_1(code.as_str()))
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string();

    let pages = edition.get("number_of_pages").and_then(numeric).map(|p| p as i32);

    let coverurl = edition
        .get("covers")
        .and_then(Value::as_array)
        .and_then(|covers| covers.iter().filter_map(Value::as_i64).find(|id| *id > 0))
        .map(|id| format!("{}/{}-L.jpg", COVERS_BASE, id));

    Book {
        openlibraryid: olid.to_string(),
        isbn: NON_ISBN_RE.replace_all(isbn, "").into_owned(),
        title,
        author,
        release_year,
        publisher,
        language,
        pages,
        coverurl,
    }
}

fn first_string<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key)
        .and_then(|v| v.get(0))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Integer from a JSON number or a numeric string
fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// MARC language code to ISO 639-1
fn iso639_1(marc: &str) -> Option<&'static str> {
    let code = match marc {
        "eng" => "en",
        "fre" | "fra" => "fr",
        "ger" | "deu" => "de",
        "spa" => "es",
        "ita" => "it",
        "por" => "pt",
        "dut" | "nld" => "nl",
        "swe" => "sv",
        "dan" => "da",
        "nor" => "no",
        "fin" => "fi",
        "pol" => "pl",
        "cze" | "ces" => "cs",
        "hun" => "hu",
        "gre" | "ell" => "el",
        "tur" => "tr",
        "rus" => "ru",
        "ukr" => "uk",
        "ara" => "ar",
        "heb" => "he",
        "hin" => "hi",
        "jpn" => "ja",
        "chi" | "zho" => "zh",
        "kor" => "ko",
        "lat" => "la",
        _ => return None,
    };
    Some(code)
}
