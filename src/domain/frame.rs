// ============================================================
// Layer 3 — Frame and DrivingSample
// ============================================================
// A Frame is one decoded camera image stored as interleaved
// RGB bytes in row-major order:
//
//   pixels[(row * width + col) * 3 + channel]
//
// This matches the [height, width, 3] layout the model expects
// before it permutes to channels-first internally.

/// A decoded RGB image, `height × width × 3` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub height: usize,
    pub width:  usize,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    /// A frame filled with a single colour.
    pub fn filled(height: usize, width: usize, rgb: [u8; 3]) -> Self {
        let pixels = rgb.iter().copied().cycle().take(height * width * Self::CHANNELS).collect();
        Self { height, width, pixels }
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, Self::CHANNELS]
    }
}

/// A decoded frame paired with the steering angle recorded for it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingSample {
    pub frame:          Frame,
    pub steering_angle: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_repeats_colour() {
        let f = Frame::filled(1, 2, [1, 2, 3]);
        assert_eq!(f.pixels, vec![1, 2, 3, 1, 2, 3]);
        assert_eq!(f.shape(), [1, 2, 3]);
    }
}
