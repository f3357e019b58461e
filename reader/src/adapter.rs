//! Post-list data adapter.
//!
//! Turns the raw JSON array returned by the posts endpoint into
//! [`NormalizedPosts`]: ids in response order plus an id-keyed record map.

use crate::client::FetchError;
use crate::types::{NormalizedPosts, PostRecord};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::hash_map::Entry;

/// `{ "rendered": "..." }` wrapper the API uses for text fields
#[derive(Debug, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: u64,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    excerpt: Rendered,
    #[serde(default)]
    content: Rendered,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    author: u64,
    #[serde(default)]
    categories: Vec<u64>,
    #[serde(default)]
    tags: Vec<u64>,
}

impl From<RawPost> for PostRecord {
    fn from(raw: RawPost) -> Self {
        Self {
            id: raw.id,
            slug: raw.slug,
            link: raw.link,
            title: raw.title.rendered,
            excerpt: raw.excerpt.rendered,
            content: raw.content.rendered,
            published_at: raw.date.as_deref().and_then(parse_date),
            author: raw.author,
            categories: raw.categories,
            tags: raw.tags,
        }
    }
}

fn parse_date(date: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Normalize a raw post-list body
///
/// A post id seen twice keeps its first position and first record.
///
/// # Errors
///
/// Returns [`FetchError::Malformed`] if the body is not an array of post
/// objects carrying a numeric `id`.
pub fn format_post_list_data(body: &serde_json::Value) -> Result<NormalizedPosts, FetchError> {
    let items = body
        .as_array()
        .ok_or_else(|| FetchError::Malformed("expected an array of posts".to_string()))?;

    let mut posts = NormalizedPosts::default();
    for (index, item) in items.iter().enumerate() {
        let raw = RawPost::deserialize(item)
            .map_err(|e| FetchError::Malformed(format!("post #{index}: {e}")))?;
        let record = PostRecord::from(raw);

        match posts.data.entry(record.post_id()) {
            Entry::Occupied(_) => {
                tracing::warn!(post_id = record.id, "Duplicate post in list, keeping the first");
            },
            Entry::Vacant(slot) => {
                posts.ids.push(record.post_id());
                slot.insert(record);
            },
        }
    }

    Ok(posts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::PostId;
    use serde_json::json;

    #[test]
    fn test_normalizes_in_response_order() {
        let body = json!([
            {
                "id": 7,
                "slug": "seventh",
                "link": "https://blog.test/posts/7/",
                "title": { "rendered": "Seventh" },
                "excerpt": { "rendered": "<p>short</p>" },
                "content": { "rendered": "<p>long</p>" },
                "date": "2017-12-23T10:15:00",
                "author": 1,
                "categories": [3],
                "tags": [4, 5]
            },
            { "id": 3, "title": { "rendered": "Third" } }
        ]);

        let posts = format_post_list_data(&body).unwrap();

        assert_eq!(posts.ids, vec![PostId::new(7), PostId::new(3)]);
        let seventh = &posts.data[&PostId::new(7)];
        assert_eq!(seventh.title, "Seventh");
        assert_eq!(seventh.tags, vec![4, 5]);
        assert_eq!(
            seventh.published_at,
            NaiveDateTime::parse_from_str("2017-12-23 10:15:00", "%Y-%m-%d %H:%M:%S").ok()
        );
        assert_eq!(posts.data[&PostId::new(3)].slug, "");
    }

    #[test]
    fn test_every_id_has_a_record() {
        let body = json!([{ "id": 1 }, { "id": 2 }, { "id": 1 }]);

        let posts = format_post_list_data(&body).unwrap();

        assert_eq!(posts.ids, vec![PostId::new(1), PostId::new(2)]);
        assert!(posts.ids.iter().all(|id| posts.data.contains_key(id)));
    }

    #[test]
    fn test_unparseable_date_is_dropped() {
        let body = json!([{ "id": 1, "date": "yesterday" }]);

        let posts = format_post_list_data(&body).unwrap();

        assert!(posts.data[&PostId::new(1)].published_at.is_none());
    }

    #[test]
    fn test_rejects_non_array_body() {
        let result = format_post_list_data(&json!({ "code": "rest_no_route" }));

        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }

    #[test]
    fn test_rejects_post_without_id() {
        let result = format_post_list_data(&json!([{ "slug": "orphan" }]));

        assert!(matches!(result, Err(FetchError::Malformed(msg)) if msg.starts_with("post #0")));
    }

    #[test]
    fn test_empty_list() {
        let posts = format_post_list_data(&json!([])).unwrap();

        assert!(posts.ids.is_empty());
        assert!(posts.data.is_empty());
    }
}
