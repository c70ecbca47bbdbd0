//! CSV import of post sheets

use std::io::Read;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::post::{check_columns, Post};
use crate::domain::DomainError;

/// One sheet row. Cells are loosely typed: numbers may be blank and flags
/// may be written as `TRUE`, `1` or `yes`.
#[derive(Debug, Deserialize)]
struct PostRow {
    #[serde(default)]
    uuid: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    file_1: String,
    #[serde(default)]
    file_2: String,
    #[serde(default)]
    file_3: String,
    #[serde(default)]
    file_4: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    with_files: Option<i32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    checked: Option<i32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    priority: Option<i32>,
    #[serde(deserialize_with = "csv::invalid_option")]
    count: Option<i32>,
    #[serde(default)]
    post_url: String,
    #[serde(default)]
    is_schedule: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let mut post = Post::new(row.id, row.text);
        post.uuid = row.uuid;
        post.file_1 = row.file_1;
        post.file_2 = row.file_2;
        post.file_3 = row.file_3;
        post.file_4 = row.file_4;
        post.with_files = row.with_files.unwrap_or_default();
        post.checked = row.checked.unwrap_or_default();
        post.priority = row.priority.unwrap_or_default();
        post.count = row.count.unwrap_or_default();
        post.post_url = row.post_url;
        post.is_schedule = parse_flag(&row.is_schedule);
        post
    }
}

fn parse_flag(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

/// Reads posts from a CSV sheet whose header row must match the post
/// column layout. Rows without text are skipped.
pub fn read_posts<R: Read>(reader: R) -> Result<Vec<Post>, DomainError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| DomainError::validation(format!("Failed to read CSV header: {}", e)))?
        .clone();
    let headers: Vec<&str> = headers.iter().collect();
    check_columns(&headers)?;

    let mut posts = Vec::new();

    for (index, record) in csv_reader.deserialize::<PostRow>().enumerate() {
        // header is row 1
        let row_number = index + 2;
        let row = record.map_err(|e| {
            DomainError::validation(format!("Invalid CSV row {}: {}", row_number, e))
        })?;

        if row.text.is_empty() {
            warn!("Skipping CSV row {} without text", row_number);
            continue;
        }

        posts.push(Post::from(row));
    }

    debug!("Read {} posts from CSV", posts.len());
    Ok(posts)
}
