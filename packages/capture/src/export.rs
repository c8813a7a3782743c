//! Dataset export: turns the saved-post list into a training-dataset
//! JSON document or a plain-text summary.
//!
//! The JSON shape is the dataset consumers already parse (snake_case,
//! `engagement` sub-object, zero-filled counts), distinct from the
//! camelCase record shape on the transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::record::{ImageRef, PostRecord, PostType, VideoRef};

const DATASET_NAME: &str = "Facebook Posts Dataset";
const DATASET_DESCRIPTION: &str =
    "Facebook posts dataset with text, images, and videos for AI training";
const DATASET_VERSION: &str = "1.0.0";
const DATASET_SOURCE: &str = "Post Capture Engine";

/// Header block of an exported dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub total_posts: usize,
    pub source: String,
}

/// Zero-filled engagement block; exports never carry nulls here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
}

/// One post in dataset form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPost {
    /// Sequential id, `post_1` onward.
    pub id: String,
    pub text: String,
    /// `"Unknown"` when no author was extracted.
    pub author: String,
    pub author_profile_url: Option<String>,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub images: Vec<ImageRef>,
    pub videos: Vec<VideoRef>,
    pub post_type: PostType,
    pub engagement: Engagement,
    pub extracted_at: DateTime<Utc>,
    pub image_count: usize,
    pub video_count: usize,
}

/// A complete exported dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_info: DatasetInfo,
    pub posts: Vec<DatasetPost>,
}

impl Dataset {
    /// Build a dataset from the saved list, in saved order.
    pub fn from_records(records: &[PostRecord]) -> Self {
        let posts = records
            .iter()
            .enumerate()
            .map(|(index, record)| DatasetPost {
                id: format!("post_{}", index + 1),
                text: record.caption.clone().unwrap_or_default(),
                author: record.author.clone().unwrap_or_else(|| "Unknown".to_string()),
                author_profile_url: record.author_profile_url.clone(),
                url: record.source_url.clone(),
                timestamp: record.captured_at,
                images: record.images.clone(),
                videos: record.videos.clone(),
                post_type: record.post_type,
                engagement: Engagement {
                    likes: record.likes.unwrap_or(0),
                    comments: record.comments.unwrap_or(0),
                    shares: record.shares.unwrap_or(0),
                },
                extracted_at: record.extraction_metadata.extracted_at,
                image_count: record.images.len(),
                video_count: record.videos.len(),
            })
            .collect();
        Dataset {
            dataset_info: DatasetInfo {
                name: DATASET_NAME.to_string(),
                description: DATASET_DESCRIPTION.to_string(),
                version: DATASET_VERSION.to_string(),
                created_at: Utc::now(),
                total_posts: records.len(),
                source: DATASET_SOURCE.to_string(),
            },
            posts,
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Human-readable summary of the saved list. Media URLs are left to the
/// JSON export.
pub fn text_summary(records: &[PostRecord]) -> String {
    let mut out = String::new();
    out.push_str("Facebook Posts Dataset - Text Summary\n");
    out.push_str(&format!("Generated: {}\n", Utc::now().to_rfc3339()));
    out.push_str(&format!("Total Posts: {}\n\n", records.len()));

    for (index, record) in records.iter().enumerate() {
        out.push_str(&format!("Post {}:\n", index + 1));
        out.push_str(&format!(
            "Author: {}\n",
            record.author.as_deref().unwrap_or("Unknown")
        ));
        out.push_str(&format!("Date: {}\n", record.captured_at.to_rfc3339()));
        out.push_str(&format!("URL: {}\n", record.source_url));
        if let Some(caption) = &record.caption {
            out.push_str(&format!("Caption: {caption}\n"));
        }
        if let Some(likes) = record.likes {
            out.push_str(&format!("Likes: {likes}\n"));
        }
        if let Some(comments) = record.comments {
            out.push_str(&format!("Comments: {comments}\n"));
        }
        if let Some(shares) = record.shares {
            out.push_str(&format!("Shares: {shares}\n"));
        }
        if !record.videos.is_empty() {
            out.push_str(&format!(
                "Videos ({}): [URLs and types in JSON export only]\n",
                record.videos.len()
            ));
        }
        out.push('\n');
        out.push_str(&"=".repeat(50));
        out.push_str("\n\n");
    }

    out.push_str("\nNote: Image and video URLs are available in the JSON export format.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<PostRecord> {
        let mut first = PostRecord::new("https://www.facebook.com/a/posts/1");
        first.author = Some("Community Kitchen".into());
        first.caption = Some("Meals going out tonight".into());
        first.likes = Some(120);
        first.post_type = PostType::Text;

        let second = PostRecord::new("https://www.facebook.com/b/posts/2");
        vec![first, second]
    }

    #[test]
    fn test_dataset_shape() {
        let dataset = Dataset::from_records(&sample_records());
        assert_eq!(dataset.dataset_info.total_posts, 2);
        assert_eq!(dataset.posts[0].id, "post_1");
        assert_eq!(dataset.posts[1].id, "post_2");
        // Missing fields are filled, not null.
        assert_eq!(dataset.posts[1].author, "Unknown");
        assert_eq!(dataset.posts[1].engagement.likes, 0);
        assert_eq!(dataset.posts[0].engagement.likes, 120);
    }

    #[test]
    fn test_dataset_json_is_snake_case() {
        let dataset = Dataset::from_records(&sample_records());
        let value: serde_json::Value = serde_json::from_str(&dataset.to_json().unwrap()).unwrap();
        assert!(value["dataset_info"]["created_at"].is_string());
        assert_eq!(value["posts"][0]["post_type"], "text");
        assert_eq!(value["posts"][0]["image_count"], 0);
        assert!(value["posts"][0].get("postType").is_none());
    }

    #[test]
    fn test_text_summary_sections() {
        let summary = text_summary(&sample_records());
        assert!(summary.starts_with("Facebook Posts Dataset - Text Summary\n"));
        assert!(summary.contains("Total Posts: 2"));
        assert!(summary.contains("Post 1:\nAuthor: Community Kitchen"));
        assert!(summary.contains("Likes: 120"));
        assert!(summary.contains(&"=".repeat(50)));
        // Absent counts are omitted, not zero-printed.
        assert!(!summary.contains("Comments:"));
    }
}
