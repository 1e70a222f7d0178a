// src/drivers/mod.rs
// Decoder core plus the plumbing around it. Nothing in here touches the GUI.
pub mod decode;
pub mod error;
pub mod extract;
pub mod frame;
pub mod normalize;
pub mod pipeline;
pub mod render;
pub mod source;
// Re-exports for the engine and GUI
pub use decode::DecodedCapture;
pub use error::TransportError;
pub use frame::{CaptureFrame, CaptureVariant, DISPLAY_RESOLUTION};
pub use pipeline::{CapturePipeline, PipelineStats, PollOutcome};
pub use render::CaptureView;
pub use source::FrameSource;
