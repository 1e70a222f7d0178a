use crate::drivers::frame::{CaptureFrame, CaptureVariant, ChannelWindow};
/// Header-stripped samples for one channel, still at native depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelPayload<'a> {
    Disabled,
    Enabled(&'a [i8]),
}
/// Slices both channel payloads out of a frame already classified as `variant`.
///
/// The caller guarantees `frame.len() == variant.frame_len()`; the layout table
/// keeps every window in bounds for that length.
pub fn extract_channels(frame: &CaptureFrame, variant: CaptureVariant) -> [ChannelPayload<'_>; 2] {
    let layout = variant.layout();
    let len = layout.payload_len();
    let samples = frame.samples();
    let channel1 = ChannelPayload::Enabled(window(samples, layout.channel1, len));
    let channel2 = layout
        .channel2
        .map(|w| ChannelPayload::Enabled(window(samples, w, len)))
        .unwrap_or(ChannelPayload::Disabled);
    [channel1, channel2]
}
fn window(samples: &[i8], w: ChannelWindow, len: usize) -> &[i8] {
    let segment = &samples[w.segment_start..];
    &segment[w.header_offset..w.header_offset + len]
}
#[cfg(test)]
mod tests {
    use super::*;
    fn ramp(len: usize) -> CaptureFrame {
        CaptureFrame::new((0..len).map(|i| (i % 251) as i8).collect())
    }
    #[test]
    fn one_channel_1k_window() {
        let frame = ramp(1125);
        let [ch1, ch2] = extract_channels(&frame, CaptureVariant::OneChannel1k);
        assert_eq!(ch1, ChannelPayload::Enabled(&frame.samples()[228..1078]));
        assert_eq!(ch2, ChannelPayload::Disabled);
    }
    #[test]
    fn one_channel_10k_window() {
        let frame = ramp(10125);
        let [ch1, ch2] = extract_channels(&frame, CaptureVariant::OneChannel10k);
        match ch1 {
            ChannelPayload::Enabled(p) => {
                assert_eq!(p.len(), 8500);
                assert_eq!(p, &frame.samples()[578..9078]);
            }
            ChannelPayload::Disabled => panic!("channel 1 must be enabled"),
        }
        assert_eq!(ch2, ChannelPayload::Disabled);
    }
    #[test]
    fn two_channel_1k_windows() {
        let frame = ramp(2184);
        let [ch1, ch2] = extract_channels(&frame, CaptureVariant::TwoChannel1k);
        assert_eq!(ch1, ChannelPayload::Enabled(&frame.samples()[262..1112]));
        let second = &frame.samples()[1125..2184];
        assert_eq!(ch2, ChannelPayload::Enabled(&second[199..1049]));
    }
    #[test]
    fn two_channel_10k_windows() {
        let frame = ramp(20184);
        let [ch1, ch2] = extract_channels(&frame, CaptureVariant::TwoChannel10k);
        assert_eq!(ch1, ChannelPayload::Enabled(&frame.samples()[350..8850]));
        assert_eq!(ch2, ChannelPayload::Enabled(&frame.samples()[10410..18910]));
    }
}
