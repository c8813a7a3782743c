//! Heuristic Post Capture Engine
//!
//! Extracts a single social post (author, caption, media, engagement)
//! from a rendered-page snapshot around a user interaction point, and
//! persists it through a pluggable store.
//!
//! # Design Philosophy
//!
//! **"Heuristics over markup trust"**
//!
//! - Cascades of independent strategies, each a fallback for the last
//! - Extraction never hard-fails on a missing field
//! - Structural signals (roles, geometry) over class names
//! - The engine owns semantics; host plumbing owns I/O
//!
//! # Usage
//!
//! ```rust,ignore
//! use capture::{CaptureConfig, CaptureRequest, CaptureService, MemoryStore};
//! use capture::dom::snapshot_from_html;
//! use capture::traits::NoopExpander;
//!
//! let service = CaptureService::new(MemoryStore::new(), CaptureConfig::new());
//! let mut page = snapshot_from_html(html, url, Default::default());
//!
//! let request = CaptureRequest::AddPost {
//!     click_x: Some(420.0),
//!     click_y: Some(310.0),
//! };
//! let response = service.handle(request, &mut page, &NoopExpander).await;
//! ```
//!
//! # Modules
//!
//! - [`dom`] - Page snapshot model (arena tree with geometry)
//! - [`locator`] - Post-container location heuristics
//! - [`extract`] - Field extraction cascades and validation
//! - [`phrases`] - Bilingual UI-chrome recognition
//! - [`service`] - Request handling, dedup and persistence
//! - [`store`] - Storage implementations (MemoryStore, etc.)
//! - [`export`] - Dataset export (JSON and text summary)
//! - [`testing`] - Snapshot builder and mock expander for tests

pub mod dom;
pub mod error;
pub mod export;
pub mod extract;
pub mod locator;
pub mod phrases;
pub mod service;
pub mod store;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{CaptureError, Result, StoreError};
pub use service::CaptureService;
pub use traits::{Expander, NoopExpander, PostStore};
pub use types::{
    config::{CaptureConfig, DedupPolicy},
    message::{CaptureRequest, CaptureResponse, ExtractionDebug, PingResponse, Response},
    record::{
        CaptionQuality, ExtractionMetadata, ImageRef, PostRecord, PostType, RecordQuality,
        VideoKind, VideoRef,
    },
};

// Re-export the locator and extractor
pub use extract::{normalize_count, Extractor};
pub use locator::PostLocator;

// Re-export export types
pub use export::{text_summary, Dataset, DatasetInfo, DatasetPost};

// Re-export stores
pub use store::MemoryStore;
