//! Post classification from final field presence.

use crate::types::record::{ImageRef, PostType, VideoRef};

/// Derive the post type from what extraction actually found. Video
/// posts subdivide by the dominant video kind (direct > on-site >
/// external > generic link) and pick up a `-with-images` qualifier when
/// images coexist. Always returns a classification.
pub(crate) fn classify(caption: Option<&str>, images: &[ImageRef], videos: &[VideoRef]) -> PostType {
    if !videos.is_empty() {
        let with_images = !images.is_empty();
        let has_direct = videos.iter().any(|v| v.kind == crate::types::record::VideoKind::Direct);
        let has_facebook = videos.iter().any(|v| v.kind.is_facebook());
        let has_external = videos.iter().any(|v| v.kind.is_external());

        return match (has_direct, has_facebook, has_external, with_images) {
            (true, _, _, false) => PostType::Video,
            (true, _, _, true) => PostType::VideoWithImages,
            (false, true, _, false) => PostType::FacebookVideo,
            (false, true, _, true) => PostType::FacebookVideoWithImages,
            (false, false, true, false) => PostType::ExternalVideo,
            (false, false, true, true) => PostType::ExternalVideoWithImages,
            (false, false, false, false) => PostType::VideoLink,
            (false, false, false, true) => PostType::VideoLinkWithImages,
        };
    }
    match images.len() {
        0 => {
            if caption.is_some_and(|c| !c.is_empty()) {
                PostType::Text
            } else {
                PostType::Empty
            }
        }
        1 => PostType::Image,
        _ => PostType::MultiImage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::VideoKind;

    fn image(url: &str) -> ImageRef {
        ImageRef {
            url: url.to_string(),
            alt: None,
            width: 320,
            height: 240,
        }
    }

    fn video(kind: VideoKind) -> VideoRef {
        VideoRef {
            url: format!("https://example.com/{kind:?}"),
            poster: None,
            kind,
            duration: None,
        }
    }

    #[test]
    fn test_presence_combinations() {
        assert_eq!(classify(None, &[], &[]), PostType::Empty);
        assert_eq!(classify(Some("hi"), &[], &[]), PostType::Text);
        assert_eq!(classify(Some("hi"), &[image("a")], &[]), PostType::Image);
        assert_eq!(
            classify(None, &[image("a"), image("b")], &[]),
            PostType::MultiImage
        );
    }

    #[test]
    fn test_video_dominance_order() {
        // Direct beats everything.
        assert_eq!(
            classify(None, &[], &[video(VideoKind::Youtube), video(VideoKind::Direct)]),
            PostType::Video
        );
        // On-site beats external.
        assert_eq!(
            classify(None, &[], &[video(VideoKind::Youtube), video(VideoKind::FacebookId)]),
            PostType::FacebookVideo
        );
        assert_eq!(
            classify(None, &[], &[video(VideoKind::Tiktok)]),
            PostType::ExternalVideo
        );
        assert_eq!(classify(None, &[], &[video(VideoKind::Link)]), PostType::VideoLink);
    }

    #[test]
    fn test_with_images_qualifier() {
        assert_eq!(
            classify(None, &[image("a")], &[video(VideoKind::Direct)]),
            PostType::VideoWithImages
        );
        assert_eq!(
            classify(None, &[image("a")], &[video(VideoKind::Vimeo)]),
            PostType::ExternalVideoWithImages
        );
    }
}
