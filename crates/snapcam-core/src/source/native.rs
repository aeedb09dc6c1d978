use crate::{CaptureError, CoreResult, Frame, source::FrameSource};

use std::panic::Location;

use error_location::ErrorLocation;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
};
use tracing::{info, instrument, warn};

/// Camera opened directly through the platform capture API via `nokhwa`.
pub struct NativeFrameSource {
    camera: Option<Camera>,
    width: u32,
    height: u32,
}

impl NativeFrameSource {
    /// Open the camera at `index` and start streaming.
    ///
    /// # Errors
    ///
    /// Returns `DeviceOpenFailed` if the camera cannot be opened or streamed.
    #[track_caller]
    #[instrument]
    pub fn open(index: u32) -> CoreResult<Self> {
        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let mut camera = Camera::new(CameraIndex::Index(index), format).map_err(|e| {
            CaptureError::DeviceOpenFailed {
                reason: format!("Failed to open camera {}: {}", index, e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        camera
            .open_stream()
            .map_err(|e| CaptureError::DeviceOpenFailed {
                reason: format!("Failed to open camera stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let resolution = camera.resolution();
        let (width, height) = (resolution.width(), resolution.height());

        info!(index, width, height, "Camera opened");

        Ok(Self {
            camera: Some(camera),
            width,
            height,
        })
    }
}

impl FrameSource for NativeFrameSource {
    #[track_caller]
    fn read(&mut self) -> CoreResult<Option<Frame>> {
        let Some(camera) = self.camera.as_mut() else {
            return Ok(None);
        };

        let buffer = camera.frame().map_err(|e| CaptureError::FrameReadFailed {
            reason: format!("Failed to capture frame: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let decoded =
            buffer
                .decode_image::<RgbFormat>()
                .map_err(|e| CaptureError::FrameReadFailed {
                    reason: format!("Failed to decode frame: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        let (width, height) = (decoded.width(), decoded.height());
        Frame::from_raw(width, height, decoded.into_raw())
            .map(Some)
            .ok_or_else(|| CaptureError::FrameReadFailed {
                reason: "Decoded frame buffer size mismatch".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn release(&mut self) {
        let Some(mut camera) = self.camera.take() else {
            return;
        };

        if let Err(e) = camera.stop_stream() {
            warn!(error = %e, "Failed to stop camera stream");
        }

        info!("Camera released");
    }
}

impl Drop for NativeFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}
