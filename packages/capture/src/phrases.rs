//! Locale-keyed phrase tables and patterns for UI-chrome detection.
//!
//! The source markup is bilingual (English and Thai) and carries no
//! stable schema, so field extraction leans on literal phrase lists and
//! shape patterns. They live here as data tables rather than inline
//! literals so the lists can grow without touching extraction logic.
//! Both locales are always active; there is no locale switch.

use regex::Regex;
use std::sync::LazyLock;

/// Locale a phrase set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    En,
    Th,
}

/// UI-chrome phrases for one locale.
#[derive(Debug, Clone, Copy)]
pub struct ChromePhrases {
    pub locale: Locale,
    /// Action labels that appear as link/button text inside a post.
    pub actions: &'static [&'static str],
    /// Labels on the "expand truncated text" control.
    pub see_more: &'static [&'static str],
    /// Other chrome strings that show up inside post text.
    pub misc: &'static [&'static str],
}

pub const CHROME: &[ChromePhrases] = &[
    ChromePhrases {
        locale: Locale::En,
        actions: &["Like", "Comment", "Share", "Follow", "Reply"],
        see_more: &["See more", "See translation"],
        misc: &[
            "Write a comment",
            "View more comments",
            "All reactions",
            "Most relevant",
            "Sponsored",
        ],
    },
    ChromePhrases {
        locale: Locale::Th,
        actions: &["ถูกใจ", "ความคิดเห็น", "แชร์", "ติดตาม", "ตอบกลับ"],
        see_more: &["ดูเพิ่มเติม", "ดูคำแปล"],
        misc: &["เขียนความคิดเห็น", "ดูความคิดเห็นเพิ่มเติม", "การแชร์", "ได้รับการสนับสนุน"],
    },
];

/// Substrings that mark a caption token as chrome when scoring caption
/// quality. Lowercase; matched with `contains`.
pub const CHROME_SUBSTRINGS: &[&str] = &[
    "like",
    "comment",
    "share",
    "follow",
    "reply",
    "see more",
    "sponsored",
    "ถูกใจ",
    "ความคิดเห็น",
    "แชร์",
    "ติดตาม",
    "ดูเพิ่มเติม",
];

/// A line that is nothing but an action label.
static RE_UI_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Like|Comment|Share|Follow|Reply|ถูกใจ|ความคิดเห็น|แชร์|ติดตาม|ตอบกลับ)\s*$")
        .unwrap()
});

/// A line that is an engagement summary, in either the count-first
/// shape ("12 comments", "1.2K ถูกใจ") or the section shapes the
/// engagement extractor recognizes ("All reactions: 57",
/// "View all 12 comments", "Shared 3 times", Thai equivalents).
static RE_ENGAGEMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    let count = r"\d+(?:,\d+)*(?:\.\d+)?\s*[KkM]?";
    Regex::new(&format!(
        r"(?i)^(?:{count}\s*(?:likes?|reactions?|comments?|shares?|people like this|ถูกใจ|ความคิดเห็น|การแชร์|แชร์)|(?:All reactions:?|การแสดงความรู้สึกทั้งหมด:?)\s*{count}|View all\s+{count}\s+comments?|ดูความคิดเห็น(?:ทั้งหมด|เพิ่มเติม)\s*{count}(?:\s*รายการ)?|(?:Shared|แชร์)\s*{count}\s*(?:times?|ครั้ง))"
    ))
    .unwrap()
});

/// Relative and short absolute timestamp shapes ("5m", "3 hrs", "2 วัน",
/// "Yesterday at 10:00").
static RE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:\d+\s*(?:s|m|h|d|w|secs?|mins?|minutes?|hrs?|hours?|days?|weeks?|วินาที|นาที|ชม\.?|ชั่วโมง|วัน|สัปดาห์)(?:\s+ago)?|(?:Yesterday|เมื่อวานนี้)(?:\s+at\s+\d{1,2}:\d{2})?|\d{1,2}\s+\p{L}+(?:\s+\d{4})?\s+at\s+\d{1,2}:\d{2})\s*$",
    )
    .unwrap()
});

/// Chrome tokens at the head of a caption ("Like Comment Share ...").
static RE_LEADING_CHROME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:Like|Comment|Share|ถูกใจ|ความคิดเห็น|แชร์)\b[\s·]*").unwrap()
});

/// Truncation ellipsis followed by the expand label.
static RE_ELLIPSIS_SEE_MORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:…|\.{3,})?\s*(?:See more|ดูเพิ่มเติม)\s*$").unwrap()
});

/// Chrome phrases that pollute image alt text, stripped before the
/// corruption checks. Auto-generated descriptions and their Thai forms.
static RE_ALT_CHROME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)May be (?:an? )?(?:image|graphic|illustration|art|cartoon|doodle|selfie|screenshot|closeup|black-and-white image) of|May be an image|No photo description available\.?|Image may contain:?|อาจเป็นรูปภาพของ|อาจเป็นการ์ตูนรูป|อาจเป็นกราฟิกรูป|ไม่มีคำอธิบายรูปภาพ|รูปภาพอาจประกอบด้วย",
    )
    .unwrap()
});

/// Mojibake and fragment signatures in alt text: replacement characters,
/// Thai double-decoded as Latin-1, and control garbage.
static RE_ALT_CORRUPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\u{FFFD}|(?:à[\u{B8}\u{B9}]){2,}|Ã.Ã.Ã|[\u{0000}-\u{0008}\u{000B}\u{000C}\u{000E}-\u{001F}]").unwrap()
});

/// A string with no letters or digits at all.
static RE_SYMBOLS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\p{L}\p{N}]*$").unwrap());

/// Is this string exactly an action label (chrome, no content)?
pub fn is_ui_only(text: &str) -> bool {
    RE_UI_ONLY.is_match(text.trim())
}

/// Does this line look like an engagement summary rather than content?
pub fn is_engagement_line(text: &str) -> bool {
    RE_ENGAGEMENT_LINE.is_match(text.trim())
}

/// Does this line look like a post timestamp?
pub fn is_timestamp_shaped(text: &str) -> bool {
    RE_TIMESTAMP.is_match(text.trim())
}

/// Is this a known chrome phrase in any locale (exact or leading match)?
pub fn is_chrome_phrase(text: &str) -> bool {
    let trimmed = text.trim();
    CHROME.iter().any(|set| {
        set.actions
            .iter()
            .chain(set.see_more)
            .chain(set.misc)
            .any(|p| trimmed.eq_ignore_ascii_case(p) || trimmed == *p)
    })
}

/// Does link/button text contain a chrome phrase in any locale?
pub fn contains_chrome_phrase(text: &str) -> bool {
    CHROME.iter().any(|set| {
        set.actions
            .iter()
            .chain(set.see_more)
            .chain(set.misc)
            .any(|p| text.contains(p))
    })
}

/// Is this the label of a "see more / see translation" control?
pub fn is_see_more_label(text: &str) -> bool {
    let lower = text.to_lowercase();
    CHROME
        .iter()
        .flat_map(|set| set.see_more)
        .any(|p| lower.contains(&p.to_lowercase()))
}

/// Strip trailing truncation ellipses together with the expand label.
pub fn strip_see_more_suffix(text: &str) -> String {
    RE_ELLIPSIS_SEE_MORE.replace(text, "").into_owned()
}

/// Strip standalone chrome tokens from the head of a caption.
pub fn strip_leading_chrome(text: &str) -> String {
    let mut out = text.trim_start().to_string();
    loop {
        let stripped = RE_LEADING_CHROME.replace(&out, "").into_owned();
        if stripped == out {
            return out;
        }
        out = stripped;
    }
}

/// Strip known chrome phrases out of alt text.
pub fn strip_alt_chrome(alt: &str) -> String {
    RE_ALT_CHROME.replace_all(alt, "").into_owned()
}

/// Does alt text carry a corruption/fragment signature?
pub fn has_corruption_signature(alt: &str) -> bool {
    RE_ALT_CORRUPTION.is_match(alt)
}

/// Is the string empty or symbols-only after cleanup?
pub fn is_symbols_only(text: &str) -> bool {
    RE_SYMBOLS_ONLY.is_match(text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_only_lines() {
        assert!(is_ui_only("Like"));
        assert!(is_ui_only("  แชร์ "));
        assert!(!is_ui_only("I like this place"));
    }

    #[test]
    fn test_engagement_lines() {
        assert!(is_engagement_line("1.2K likes"));
        assert!(is_engagement_line("All reactions: 57"));
        assert!(is_engagement_line("34 ความคิดเห็น"));
        assert!(is_engagement_line("View all 12 comments"));
        assert!(is_engagement_line("Shared 3 times"));
        assert!(is_engagement_line("ดูความคิดเห็นทั้งหมด 12 รายการ"));
        assert!(is_engagement_line("แชร์ 3 ครั้ง"));
        assert!(!is_engagement_line("We served 1,200 meals today"));
        assert!(!is_engagement_line("View all the photos from the gala"));
    }

    #[test]
    fn test_timestamp_shapes() {
        assert!(is_timestamp_shaped("5m"));
        assert!(is_timestamp_shaped("3 hrs ago"));
        assert!(is_timestamp_shaped("2 วัน"));
        assert!(is_timestamp_shaped("Yesterday at 10:00"));
        assert!(!is_timestamp_shaped("5 million reasons"));
    }

    #[test]
    fn test_see_more_stripping() {
        assert_eq!(strip_see_more_suffix("Long story… See more"), "Long story");
        assert_eq!(strip_see_more_suffix("เรื่องยาว... ดูเพิ่มเติม"), "เรื่องยาว");
        // A bare trailing ellipsis without the label is kept.
        assert_eq!(strip_see_more_suffix("Wait for it…"), "Wait for it…");
    }

    #[test]
    fn test_leading_chrome_stripping() {
        assert_eq!(strip_leading_chrome("Like · Share Hello"), "Hello");
        assert_eq!(strip_leading_chrome("Hello Like"), "Hello Like");
    }

    #[test]
    fn test_alt_chrome() {
        assert_eq!(
            strip_alt_chrome("May be an image of 3 people and text").trim(),
            "3 people and text"
        );
        assert!(has_corruption_signature("à¸à¸£à¸¸à¸"));
        assert!(is_symbols_only("·· — !!"));
        assert!(!is_symbols_only("meal 1"));
    }
}
