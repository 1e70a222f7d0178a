#[cfg(test)]
use std::collections::VecDeque;
use crate::drivers::error::TransportError;
use crate::drivers::frame::CaptureFrame;
/// Anything that can answer one trigger with a raw capture frame.
///
/// An empty frame is a valid answer (the instrument stayed silent for a whole
/// read timeout). Only connection-level faults are errors.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<CaptureFrame, TransportError>;
}
impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<CaptureFrame, TransportError> {
        (**self).next_frame()
    }
}
/// In-memory source for deterministic playback in tests.
/// Reports [`TransportError::Closed`] once drained.
#[cfg(test)]
pub struct ManualSource {
    queue: VecDeque<CaptureFrame>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new(frames: impl IntoIterator<Item = CaptureFrame>) -> Self {
        Self {
            queue: frames.into_iter().collect(),
        }
    }
}
#[cfg(test)]
impl FrameSource for ManualSource {
    fn next_frame(&mut self) -> Result<CaptureFrame, TransportError> {
        self.queue.pop_front().ok_or(TransportError::Closed)
    }
}
