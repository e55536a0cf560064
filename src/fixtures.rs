//! Fixture records and constants.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const INDEX_NAME: &str = "elastic-test";
pub const INDEX_NAME_2: &str = "elastic-test2";
pub const FIXTURE_INDICES: [&str; 2] = [INDEX_NAME, INDEX_NAME_2];

pub const TWEET_TYPE: &str = "tweet";
pub const COMMENT_TYPE: &str = "comment";
pub const ORDER_TYPE: &str = "order";
pub const DOCTYPE_TYPE: &str = "doctype";
pub const QUERIES_TYPE: &str = "queries";
pub const TWEET_NOSOURCE_TYPE: &str = "tweet-nosource";

/// Completion-suggester input with an optional category context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestField {
    pub input: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub user: String,
    pub message: String,
    #[serde(default)]
    pub retweets: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    #[serde(
        rename = "suggest_field",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suggest: Option<SuggestField>,
}

impl Tweet {
    pub fn new(user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for Tweet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tweet{{User:{:?},Message:{:?},Retweets:{}}}",
            self.user, self.message, self.retweets
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user: String,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(user: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            comment: comment.into(),
            created: None,
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "comment{{User:{:?},Comment:{:?}}}", self.user, self.comment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub article: String,
    pub manufacturer: String,
    pub price: f64,
    /// `YYYY-MM-dd`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub time: String,
}

impl Order {
    pub fn new(article: &str, manufacturer: &str, price: f64, time: &str) -> Self {
        Self {
            article: article.to_string(),
            manufacturer: manufacturer.to_string(),
            price,
            time: time.to_string(),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order{{Article:{:?},Manufacturer:{:?},Price:{},Time:{}}}",
            self.article, self.manufacturer, self.price, self.time
        )
    }
}

/// Document percolated against stored queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doctype {
    pub message: String,
}

/// Stored percolator query (document type `queries`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PercolatorQuery {
    pub query: Value,
}

pub fn tweets() -> [Tweet; 3] {
    [
        Tweet::new("olivere", "Welcome to Golang and Elasticsearch."),
        Tweet::new("olivere", "Another unrelated topic."),
        Tweet::new("sandrae", "Cycling is fun."),
    ]
}

pub fn comment() -> Comment {
    Comment::new("nico", "You bet.")
}

pub fn orders() -> [Order; 8] {
    [
        Order::new("Apple MacBook", "Apple", 1290.0, "2015-01-18"),
        Order::new("Paper", "Canon", 100.0, "2015-03-01"),
        Order::new("Apple iPad", "Apple", 499.0, "2015-04-12"),
        Order::new("Dell XPS 13", "Dell", 1600.0, "2015-04-18"),
        Order::new("Apple Watch", "Apple", 349.0, "2015-04-29"),
        Order::new("Samsung TV", "Samsung", 790.0, "2015-05-03"),
        Order::new("Hoodie", "h&m", 49.0, "2015-06-03"),
        Order::new("T-Shirt", "h&m", 19.0, "2015-06-18"),
    ]
}

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Random ASCII-letter string of length `n`.
pub fn random_string(n: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}
