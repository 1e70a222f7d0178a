// src/simulator.rs
use rand::Rng;
use std::thread;
use std::time::Duration;
use crate::drivers::frame::ChannelWindow;
use crate::drivers::{CaptureFrame, CaptureVariant, FrameSource, TransportError};
/// Stand-in instrument that produces frames laid out like the real scope.
///
/// Header bytes are random junk, payloads are sines with a little noise, so a
/// wrong offset shows up on the plot as garbage at the trace edges.
pub struct SimulatedScope {
    variant: CaptureVariant,
    phase: f64,
    /// Chance (0..1) that a frame is truncated, to exercise the reject path.
    truncate_chance: f64,
    pace: Duration,
}
impl SimulatedScope {
    pub fn new(variant: CaptureVariant, pace: Duration) -> Self {
        Self {
            variant,
            phase: 0.0,
            truncate_chance: 0.0,
            pace,
        }
    }
    pub fn with_truncate_chance(mut self, chance: f64) -> Self {
        self.truncate_chance = chance.clamp(0.0, 1.0);
        self
    }
    pub fn synthesize(&mut self) -> CaptureFrame {
        let mut rng = rand::thread_rng();
        let layout = self.variant.layout();
        let mut raw: Vec<i8> = (0..layout.frame_len).map(|_| rng.gen()).collect();
        let payload_len = layout.payload_len();
        let windows = [Some(layout.channel1), layout.channel2];
        for (ch, window) in windows.iter().enumerate() {
            let Some(ChannelWindow {
                segment_start,
                header_offset,
            }) = *window
            else {
                continue;
            };
            let start = segment_start + header_offset;
            let cycles = 3.0 + ch as f64 * 2.0;
            let amplitude = 90.0 - ch as f64 * 30.0;
            for i in 0..payload_len {
                let t = i as f64 / payload_len as f64;
                let v = amplitude * (2.0 * std::f64::consts::PI * cycles * t + self.phase).sin()
                    + rng.gen_range(-3.0..3.0);
                raw[start + i] = v.round().clamp(-128.0, 127.0) as i8;
            }
        }
        self.phase += 0.15;
        if rng.gen_bool(self.truncate_chance) {
            raw.truncate(truncation_point(&mut rng, layout.frame_len));
        }
        CaptureFrame::new(raw)
    }
}
/// Random cut point below `frame_len` that never lands on a length another
/// layout would accept.
fn truncation_point<R: Rng>(rng: &mut R, frame_len: usize) -> usize {
    let accepted = CaptureVariant::accepted_lengths();
    loop {
        let keep = rng.gen_range(0..frame_len);
        if !accepted.contains(&keep) {
            return keep;
        }
    }
}
impl FrameSource for SimulatedScope {
    fn next_frame(&mut self) -> Result<CaptureFrame, TransportError> {
        // Mirrors the idle timeout that ends a real read.
        thread::sleep(self.pace);
        Ok(self.synthesize())
    }
}
