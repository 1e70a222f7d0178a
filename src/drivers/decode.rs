use crate::drivers::error::DecodeError;
use crate::drivers::extract::{extract_channels, ChannelPayload};
use crate::drivers::frame::{CaptureFrame, CaptureVariant, MemoryDepth};
use crate::drivers::normalize::{normalize, placeholder};
/// One channel at display resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelWaveform {
    pub enabled: bool,
    pub samples: Vec<i8>,
}
impl ChannelWaveform {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            samples: placeholder(),
        }
    }
    fn from_payload(payload: ChannelPayload<'_>, depth: MemoryDepth) -> Self {
        match payload {
            ChannelPayload::Enabled(raw) => Self {
                enabled: true,
                samples: normalize(raw, depth),
            },
            ChannelPayload::Disabled => Self::disabled(),
        }
    }
}
/// Both channels of one trigger, ready for the plot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCapture {
    pub variant: CaptureVariant,
    pub channels: [ChannelWaveform; 2],
}
impl DecodedCapture {
    pub fn channel1(&self) -> &ChannelWaveform {
        &self.channels[0]
    }
    pub fn channel2(&self) -> &ChannelWaveform {
        &self.channels[1]
    }
}
/// Classify, extract and normalize a raw frame. Pure.
pub fn decode_frame(frame: &CaptureFrame) -> Result<DecodedCapture, DecodeError> {
    let variant = CaptureVariant::classify(frame)?;
    let depth = variant.layout().depth;
    let [ch1, ch2] = extract_channels(frame, variant);
    Ok(DecodedCapture {
        variant,
        channels: [
            ChannelWaveform::from_payload(ch1, depth),
            ChannelWaveform::from_payload(ch2, depth),
        ],
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::frame::DISPLAY_RESOLUTION;
    use rand::Rng;
    fn random_frame(len: usize) -> CaptureFrame {
        let mut rng = rand::thread_rng();
        CaptureFrame::new((0..len).map(|_| rng.gen()).collect())
    }
    #[test]
    fn single_spike_decodes_to_hold_blocks() {
        let mut raw = vec![0i8; 1125];
        raw[228] = 100;
        raw[229] = -7;
        let decoded = decode_frame(&CaptureFrame::new(raw)).unwrap();
        assert_eq!(decoded.variant, CaptureVariant::OneChannel1k);
        let ch1 = decoded.channel1();
        assert!(ch1.enabled);
        assert!(ch1.samples[..10].iter().all(|&v| v == 100));
        assert!(ch1.samples[10..20].iter().all(|&v| v == -7));
        assert!(ch1.samples[20..].iter().all(|&v| v == 0));
        let ch2 = decoded.channel2();
        assert!(!ch2.enabled);
        assert!(ch2.samples.iter().all(|&v| v == 0));
    }
    #[test]
    fn every_variant_yields_display_resolution() {
        for variant in CaptureVariant::ALL {
            let decoded = decode_frame(&random_frame(variant.frame_len())).unwrap();
            assert_eq!(decoded.variant, variant);
            for ch in &decoded.channels {
                assert_eq!(ch.samples.len(), DISPLAY_RESOLUTION);
            }
            assert!(decoded.channel1().enabled);
            assert_eq!(
                decoded.channel2().enabled,
                variant.layout().channel2.is_some()
            );
        }
    }
    #[test]
    fn two_channel_1k_upsamples_both_channels() {
        let frame = random_frame(2184);
        let decoded = decode_frame(&frame).unwrap();
        let ch2_raw = &frame.samples()[1125 + 199..1125 + 1049];
        for (i, &v) in decoded.channel2().samples.iter().enumerate() {
            assert_eq!(v, ch2_raw[i / 10]);
        }
        let ch1_raw = &frame.samples()[262..1112];
        assert_eq!(decoded.channel1().samples[8499], ch1_raw[849]);
    }
    #[test]
    fn decoding_is_deterministic() {
        let frame = random_frame(20184);
        assert_eq!(decode_frame(&frame).unwrap(), decode_frame(&frame).unwrap());
    }
    #[test]
    fn empty_frame_is_rejected() {
        let err = decode_frame(&CaptureFrame::default()).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidFrameLength { actual: 0, .. }));
    }
}
