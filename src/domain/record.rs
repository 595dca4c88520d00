use std::path::PathBuf;

/// One dataset row resolved to its typed attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingRecord {
    /// Location of the centre camera image on disk
    pub image_path: PathBuf,
    /// Recorded steering angle, roughly in [-1, 1]
    pub steering_angle: f32,
}

impl DrivingRecord {
    pub fn new(image_path: impl Into<PathBuf>, steering_angle: f32) -> Self {
        Self { image_path: image_path.into(), steering_angle }
    }
}
