use crate::drivers::decode::DecodedCapture;
/// Plot-ready form of one channel.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesView {
    /// Zero-based channel index, used to pick the trace color.
    pub channel: usize,
    pub name: String,
    pub visible: bool,
    pub points: Vec<[f64; 2]>,
}
/// What the live plot draws for one capture: two series on a fixed x axis.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureView {
    pub title: String,
    pub series: [SeriesView; 2],
}
impl CaptureView {
    /// `shown` is the user's per-channel toggle; a series is drawn only when
    /// both the toggle and the capture's enabled flag are set.
    pub fn from_capture(capture: &DecodedCapture, shown: [bool; 2]) -> Self {
        let channels = [capture.channel1(), capture.channel2()];
        let series = [0usize, 1].map(|idx| {
            let channel = channels[idx];
            SeriesView {
                channel: idx,
                name: format!("CH{}", idx + 1),
                visible: channel.enabled && shown[idx],
                points: channel
                    .samples
                    .iter()
                    .enumerate()
                    .map(|(t, &v)| [t as f64, v as f64])
                    .collect(),
            }
        });
        Self {
            title: capture.variant.label().to_owned(),
            series,
        }
    }
    pub fn visible_series(&self) -> impl Iterator<Item = &SeriesView> {
        self.series.iter().filter(|s| s.visible)
    }
}
