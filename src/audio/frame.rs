// The smallest unit of audio; one stereo frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Mixes a mono sample in with an equal-power pan, -1.0 (left) to 1.0 (right).
    pub fn add_panned(&mut self, sample: f32, pan: f32) {
        let angle = (pan.clamp(-1.0, 1.0) + 1.0) * std::f32::consts::FRAC_PI_4;
        self.left += sample * angle.cos();
        self.right += sample * angle.sin();
    }

    pub fn scale(&mut self, gain: f32) {
        self.left *= gain;
        self.right *= gain;
    }
}
