//! Capture frame types and the per-variant layout table.
//!
//! The instrument answers `STARTMEMDEPTH` with a bare run of bytes. Nothing in
//! the payload says how many channels were active or which memory depth was
//! configured, so the total byte length is the only way to tell the layouts
//! apart. Every offset the extractor uses lives in [`VariantLayout`].
use crate::drivers::error::DecodeError;
/// Number of points every channel is normalized to before plotting.
pub const DISPLAY_RESOLUTION: usize = 8500;
/// Raw bytes returned for one trigger, each byte one signed sample.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureFrame {
    samples: Vec<i8>,
}
impl CaptureFrame {
    pub fn new(samples: Vec<i8>) -> Self {
        Self { samples }
    }
    /// Reinterprets wire bytes as two's-complement samples.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            samples: bytes.iter().map(|&b| b as i8).collect(),
        }
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn samples(&self) -> &[i8] {
        &self.samples
    }
}
/// Configured number of native samples per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemoryDepth {
    K1,
    K10,
}
impl MemoryDepth {
    pub const fn native_len(self) -> usize {
        match self {
            MemoryDepth::K1 => 850,
            MemoryDepth::K10 => 8500,
        }
    }
    /// How many display slots one native sample occupies.
    pub const fn repeat_factor(self) -> usize {
        DISPLAY_RESOLUTION / self.native_len()
    }
}
/// Where one channel's payload sits inside a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelWindow {
    /// Start of the channel's own segment within the frame.
    pub segment_start: usize,
    /// Header bytes to skip inside that segment.
    pub header_offset: usize,
}
impl ChannelWindow {
    const fn at(segment_start: usize, header_offset: usize) -> Self {
        Self {
            segment_start,
            header_offset,
        }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantLayout {
    pub frame_len: usize,
    pub depth: MemoryDepth,
    pub channel1: ChannelWindow,
    pub channel2: Option<ChannelWindow>,
}
impl VariantLayout {
    pub const fn payload_len(&self) -> usize {
        self.depth.native_len()
    }
}
const ONE_CHANNEL_1K: VariantLayout = VariantLayout {
    frame_len: 1125,
    depth: MemoryDepth::K1,
    channel1: ChannelWindow::at(0, 228),
    channel2: None,
};
const ONE_CHANNEL_10K: VariantLayout = VariantLayout {
    frame_len: 10125,
    depth: MemoryDepth::K10,
    channel1: ChannelWindow::at(0, 578),
    channel2: None,
};
// Channel 2 segments start right after a full single-channel frame.
const TWO_CHANNEL_1K: VariantLayout = VariantLayout {
    frame_len: 2184,
    depth: MemoryDepth::K1,
    channel1: ChannelWindow::at(0, 262),
    channel2: Some(ChannelWindow::at(ONE_CHANNEL_1K.frame_len, 199)),
};
// TODO: revalidate these offsets against a captured 2-channel 10k frame from
// the instrument; they have not been checked on hardware yet.
const TWO_CHANNEL_10K: VariantLayout = VariantLayout {
    frame_len: 20184,
    depth: MemoryDepth::K10,
    channel1: ChannelWindow::at(0, 350),
    channel2: Some(ChannelWindow::at(ONE_CHANNEL_10K.frame_len, 285)),
};
/// The four capture configurations the instrument can answer with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaptureVariant {
    OneChannel1k,
    OneChannel10k,
    TwoChannel1k,
    TwoChannel10k,
}
impl CaptureVariant {
    pub const ALL: [CaptureVariant; 4] = [
        CaptureVariant::OneChannel1k,
        CaptureVariant::OneChannel10k,
        CaptureVariant::TwoChannel1k,
        CaptureVariant::TwoChannel10k,
    ];
    pub fn layout(self) -> &'static VariantLayout {
        match self {
            CaptureVariant::OneChannel1k => &ONE_CHANNEL_1K,
            CaptureVariant::OneChannel10k => &ONE_CHANNEL_10K,
            CaptureVariant::TwoChannel1k => &TWO_CHANNEL_1K,
            CaptureVariant::TwoChannel10k => &TWO_CHANNEL_10K,
        }
    }
    pub fn frame_len(self) -> usize {
        self.layout().frame_len
    }
    pub fn label(self) -> &'static str {
        match self {
            CaptureVariant::OneChannel1k => "1 CH / 1k",
            CaptureVariant::OneChannel10k => "1 CH / 10k",
            CaptureVariant::TwoChannel1k => "2 CH / 1k",
            CaptureVariant::TwoChannel10k => "2 CH / 10k",
        }
    }
    /// Frame lengths accepted by [`CaptureVariant::classify`].
    pub fn accepted_lengths() -> Vec<usize> {
        Self::ALL.iter().map(|v| v.frame_len()).collect()
    }
    /// Exact-length lookup. Anything else, including an empty read, is rejected.
    pub fn classify(frame: &CaptureFrame) -> Result<Self, DecodeError> {
        Self::ALL
            .into_iter()
            .find(|v| v.frame_len() == frame.len())
            .ok_or_else(|| DecodeError::InvalidFrameLength {
                actual: frame.len(),
                accepted: Self::accepted_lengths(),
            })
    }
}
