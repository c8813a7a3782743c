//! Data types: captured records, wire messages, configuration.

pub mod config;
pub mod message;
pub mod record;

pub use config::{CaptureConfig, DedupPolicy};
pub use message::{CaptureRequest, CaptureResponse, ExtractionDebug, PingResponse, Response};
pub use record::{
    CaptionQuality, ExtractionMetadata, ImageRef, PostRecord, PostType, RecordQuality, VideoKind,
    VideoRef,
};
