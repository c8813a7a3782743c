//! Integration tests for the full capture flow.
//!
//! These tests drive the whole pipeline the way the host transport
//! does: build a snapshot, send an `addPost` request, assert on the
//! stored record.

use capture::dom::{snapshot_from_html, NodeData, Point, Rect, Viewport};
use capture::testing::{ScriptedExpander, SnapshotBuilder};
use capture::{
    CaptureConfig, CaptureRequest, CaptureService, DedupPolicy, MemoryStore, NoopExpander,
    PostStore, PostType, RecordQuality, Response,
};

fn service() -> CaptureService<MemoryStore> {
    CaptureService::new(MemoryStore::new(), CaptureConfig::new())
}

/// A feed-style article with a caption, an optional CDN image, and the
/// usual chrome rows around it.
fn article(builder: SnapshotBuilder, label: &str, top: f64, caption: &str) -> SnapshotBuilder {
    let caption_label = format!("{label}-caption");
    builder
        .node(
            "root",
            label,
            NodeData::new("div")
                .with_attr("role", "article")
                .with_rect(Rect::new(140.0, top, 1000.0, 560.0)),
        )
        .node(
            label,
            &format!("{label}-author"),
            NodeData::new("a")
                .with_attr("href", "https://www.facebook.com/communitykitchen")
                .with_text("Community Kitchen")
                .with_rect(Rect::new(160.0, top + 20.0, 200.0, 20.0)),
        )
        .node(
            label,
            &caption_label,
            NodeData::new("div")
                .with_attr("dir", "auto")
                .with_text(caption)
                .with_rect(Rect::new(160.0, top + 80.0, 960.0, 40.0)),
        )
        .node(
            label,
            &format!("{label}-chrome"),
            NodeData::new("div")
                .with_text("Like Comment Share")
                .with_rect(Rect::new(160.0, top + 520.0, 960.0, 20.0)),
        )
}

#[tokio::test]
async fn test_image_post_end_to_end() {
    let (mut page, labels) = article(
        SnapshotBuilder::new("https://www.facebook.com/communitykitchen/posts/77"),
        "post",
        100.0,
        "Fresh bread for the shelter run this morning",
    )
    .node(
        "post",
        "photo",
        NodeData::new("img")
            .with_attr("src", "https://scontent.xx.fbcdn.net/v/t39/bread.jpg")
            .with_attr("alt", "Loaves on a rack")
            .with_rect(Rect::new(160.0, 240.0, 150.0, 150.0)),
    )
    .build();

    let service = service();
    let record = service
        .capture(&mut page, Some(Point::new(400.0, 300.0)), &NoopExpander)
        .await
        .unwrap();

    assert_eq!(record.author.as_deref(), Some("Community Kitchen"));
    assert_eq!(
        record.caption.as_deref(),
        Some("Fresh bread for the shelter run this morning")
    );
    assert_eq!(record.images.len(), 1);
    assert_eq!(record.images[0].alt.as_deref(), Some("Loaves on a rack"));
    assert_eq!(record.post_type, PostType::Image);
    assert_eq!(record.quality, RecordQuality::Good);
    // No engagement rows in the fixture: counts stay unknown.
    assert_eq!(record.likes, None);
    assert_eq!(record.comments, None);
    assert_eq!(record.shares, None);

    let saved = service.store().load_posts().await.unwrap();
    assert_eq!(saved.len(), 1);
    let _ = labels;
}

#[tokio::test]
async fn test_truncated_caption_expanded_in_feed_view() {
    // Two articles so the page does not classify as a single-post view.
    let builder = article(
        SnapshotBuilder::new("https://www.facebook.com/"),
        "first",
        0.0,
        "Unrelated neighboring post with its own caption",
    );
    let (mut page, labels) = article(builder, "second", 600.0, "Setup for the weekend…")
        .node(
            "second",
            "see-more",
            NodeData::new("div")
                .with_attr("role", "button")
                .with_text("See more")
                .with_rect(Rect::new(160.0, 700.0, 80.0, 20.0)),
        )
        .build();

    let expander = ScriptedExpander::new(
        labels.id("second-caption"),
        "Setup for the weekend food drive starts Friday at noon, volunteers welcome",
    );
    let service = service();
    let record = service
        .capture(&mut page, Some(Point::new(400.0, 700.0)), &expander)
        .await
        .unwrap();

    assert_eq!(expander.activations(), 1);
    assert_eq!(
        record.caption.as_deref(),
        Some("Setup for the weekend food drive starts Friday at noon, volunteers welcome")
    );
}

#[tokio::test]
async fn test_engagement_counts_normalized() {
    let (mut page, _labels) = article(
        SnapshotBuilder::new("https://www.facebook.com/communitykitchen/posts/78"),
        "post",
        100.0,
        "Thanks everyone who showed up on Saturday",
    )
    .node(
        "post",
        "reactions",
        NodeData::new("span")
            .with_attr("aria-label", "1.2K reactions")
            .with_rect(Rect::new(160.0, 560.0, 120.0, 20.0)),
    )
    .node(
        "post",
        "comments",
        NodeData::new("div")
            .with_text("View all 34 comments")
            .with_rect(Rect::new(160.0, 580.0, 200.0, 20.0)),
    )
    .build();

    let record = service()
        .capture(&mut page, Some(Point::new(400.0, 300.0)), &NoopExpander)
        .await
        .unwrap();
    assert_eq!(record.likes, Some(1200));
    assert_eq!(record.comments, Some(34));
    assert_eq!(record.shares, None);
    assert!(record.extraction_metadata.has_engagement_data);
}

#[tokio::test]
async fn test_author_window_dedup_across_pages() {
    let service = service();
    for post_id in [1, 2] {
        let (mut page, _labels) = article(
            SnapshotBuilder::new(format!(
                "https://www.facebook.com/communitykitchen/posts/{post_id}"
            )),
            "post",
            100.0,
            "Same author posting twice in quick succession",
        )
        .build();
        let result = service
            .capture(&mut page, Some(Point::new(400.0, 300.0)), &NoopExpander)
            .await;
        if post_id == 1 {
            result.unwrap();
        } else {
            // Different URL, same author inside the window.
            result.unwrap_err();
        }
    }
    assert_eq!(service.store().post_count(), 1);

    // With dedup off the same pair stores twice.
    let permissive = CaptureService::new(
        MemoryStore::new(),
        CaptureConfig::new().with_dedup(DedupPolicy::Off),
    );
    for post_id in [1, 2] {
        let (mut page, _labels) = article(
            SnapshotBuilder::new(format!(
                "https://www.facebook.com/communitykitchen/posts/{post_id}"
            )),
            "post",
            100.0,
            "Same author posting twice in quick succession",
        )
        .build();
        permissive
            .capture(&mut page, Some(Point::new(400.0, 300.0)), &NoopExpander)
            .await
            .unwrap();
    }
    assert_eq!(permissive.store().post_count(), 2);
}

#[tokio::test]
async fn test_transport_round_trip_over_json() {
    let (mut page, _labels) = article(
        SnapshotBuilder::new("https://www.facebook.com/communitykitchen/posts/79"),
        "post",
        100.0,
        "Captured through the wire-shaped request",
    )
    .build();

    let request: CaptureRequest =
        serde_json::from_str(r#"{"action":"addPost","clickX":400.0,"clickY":300.0}"#).unwrap();
    let response = service().handle(request, &mut page, &NoopExpander).await;
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(
        value["postData"]["caption"],
        "Captured through the wire-shaped request"
    );
    assert_eq!(value["postData"]["postType"], "text");
}

#[tokio::test]
async fn test_html_snapshot_capture() {
    let html = r#"
        <html><body>
          <div role="article">
            <a href="https://www.facebook.com/riversidegarden">Riverside Garden</a>
            <div dir="auto">Seedlings are in, come help us plant the beds</div>
            <img src="https://scontent.xx.fbcdn.net/v/t39/beds.jpg"
                 width="480" height="360" alt="Raised beds">
          </div>
        </body></html>
    "#;
    let mut page = snapshot_from_html(
        html,
        "https://www.facebook.com/riversidegarden/posts/5",
        Viewport::default(),
    );

    let response = service()
        .handle(
            CaptureRequest::AddPost {
                click_x: None,
                click_y: None,
            },
            &mut page,
            &NoopExpander,
        )
        .await;
    let Response::Capture(capture) = response else {
        panic!("expected capture response");
    };
    assert!(capture.success, "{:?}", capture.error);
    let record = capture.post_data.unwrap();
    assert_eq!(
        record.caption.as_deref(),
        Some("Seedlings are in, come help us plant the beds")
    );
    assert_eq!(record.images.len(), 1);
    assert_eq!(record.post_type, PostType::Image);
}

#[tokio::test]
async fn test_export_after_captures() {
    let service = service();
    let (mut page, _labels) = article(
        SnapshotBuilder::new("https://www.facebook.com/communitykitchen/posts/80"),
        "post",
        100.0,
        "One post to export",
    )
    .build();
    service
        .capture(&mut page, Some(Point::new(400.0, 300.0)), &NoopExpander)
        .await
        .unwrap();

    let saved = service.store().load_posts().await.unwrap();
    let dataset = capture::Dataset::from_records(&saved);
    assert_eq!(dataset.dataset_info.total_posts, 1);
    assert_eq!(dataset.posts[0].id, "post_1");
    assert_eq!(dataset.posts[0].author, "Community Kitchen");

    let summary = capture::text_summary(&saved);
    assert!(summary.contains("One post to export"));
}
