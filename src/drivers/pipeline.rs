use log::{debug, warn};
use crate::drivers::decode::{decode_frame, DecodedCapture};
use crate::drivers::error::{DecodeError, TransportError};
use crate::drivers::frame::CaptureVariant;
use crate::drivers::source::FrameSource;
/// Result of one poll cycle that did not hit a transport fault.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Decoded(DecodedCapture),
    /// The frame was unusable; skip rendering and poll again.
    Rejected(DecodeError),
}
/// Running counters kept across poll cycles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub frames_decoded: u64,
    pub frames_rejected: u64,
    pub last_variant: Option<CaptureVariant>,
    pub last_rejected_len: Option<usize>,
}
/// Pulls frames from a source and runs them through the decoder.
pub struct CapturePipeline<S: FrameSource> {
    source: S,
    stats: PipelineStats,
}
impl<S: FrameSource> CapturePipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            stats: PipelineStats::default(),
        }
    }
    /// One trigger/read/decode cycle. Only transport faults escape as errors.
    pub fn pump_once(&mut self) -> Result<PollOutcome, TransportError> {
        let frame = self.source.next_frame()?;
        if frame.is_empty() {
            debug!("instrument stayed silent for a whole read timeout");
        }
        match decode_frame(&frame) {
            Ok(capture) => {
                debug!("decoded {:?} frame ({} bytes)", capture.variant, frame.len());
                self.stats.frames_decoded += 1;
                self.stats.last_variant = Some(capture.variant);
                Ok(PollOutcome::Decoded(capture))
            }
            Err(err) => {
                warn!("skipping frame: {err}");
                self.stats.frames_rejected += 1;
                self.stats.last_rejected_len = Some(frame.len());
                Ok(PollOutcome::Rejected(err))
            }
        }
    }
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }
}
