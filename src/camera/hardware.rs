//! Webcam source backed by nokhwa.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::{query, Camera};

use super::source::FrameSource;
use super::types::{CameraError, CameraInfo, CameraSettings, PixelFormat, RawFrame};

/// Cameras the platform backend can see, in backend order.
///
/// An empty list is not an error; `HardwareSource::new` turns it into
/// `CameraError::NoDevices` when a camera is actually needed.
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    let found = query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;
    let cameras = found
        .into_iter()
        .enumerate()
        .map(|(position, info)| CameraInfo {
            index: info.index().as_index().unwrap_or(position as u32),
            name: info.human_name(),
            description: info.description().to_string(),
        })
        .collect::<Vec<_>>();
    log::debug!("Found {} camera(s)", cameras.len());
    Ok(cameras)
}

/// A physical camera.
///
/// The nokhwa `Camera` is created inside the capture thread by `open`,
/// which is why only the settings live on this struct.
#[derive(Debug, Clone)]
pub struct HardwareSource {
    settings: CameraSettings,
}

impl HardwareSource {
    /// Check that the device exists; the stream is opened later by the coordinator.
    ///
    /// # Errors
    /// * `CameraError::DeviceNotFound` - If the device index doesn't exist
    pub fn new(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if devices.is_empty() {
            return Err(CameraError::NoDevices);
        }
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }
}

impl FrameSource for HardwareSource {
    type Handle = Camera;

    fn open(&mut self) -> Result<Self::Handle, CameraError> {
        let index = CameraIndex::Index(self.settings.device_index);
        let mut camera = open_camera_with_fallback(&index, &self.settings)?;
        camera
            .open_stream()
            .map_err(|e| CameraError::CannotOpen(e.to_string()))?;
        let res = camera.resolution();
        log::info!(
            "Camera {} streaming at {}x{} @ {} fps",
            self.settings.device_index,
            res.width(),
            res.height(),
            camera.frame_rate()
        );
        Ok(camera)
    }

    fn read_one(&mut self, handle: &mut Self::Handle) -> Option<RawFrame> {
        let buffer = handle.frame().ok()?;
        // Handles MJPEG, YUYV, NV12 etc. via nokhwa's decoder
        let decoded = buffer.decode_image::<RgbFormat>().ok()?;
        let resolution = buffer.resolution();
        Some(RawFrame::new(
            decoded.into_raw(),
            resolution.width(),
            resolution.height(),
            PixelFormat::Rgb,
        ))
    }

    fn pause(&mut self, handle: &mut Self::Handle) -> Result<(), CameraError> {
        handle
            .stop_stream()
            .map_err(|e| CameraError::ReleaseFailed(e.to_string()))
    }

    fn resume(&mut self, mut handle: Self::Handle) -> Result<Self::Handle, CameraError> {
        handle
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;
        Ok(handle)
    }

    fn close(&mut self, mut handle: Self::Handle) -> Result<(), CameraError> {
        if handle.is_stream_open() {
            handle
                .stop_stream()
                .map_err(|e| CameraError::ReleaseFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn mirror(&self) -> bool {
        self.settings.mirror
    }

    fn name(&self) -> String {
        format!("camera {}", self.settings.device_index)
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    // In order of preference:
    // 1. Closest match with NV12 (common on macOS)
    // 2. Closest match with MJPEG (widely supported)
    // 3. Highest resolution available (let camera decide format)
    let requested_resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::NV12,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;
    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("Camera format attempt failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    let msg = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no format accepted".to_string());
    let lower = msg.to_lowercase();
    if lower.contains("permission")
        || lower.contains("denied")
        || lower.contains("authorization")
        || lower.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::CannotOpen(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device_is_rejected() {
        // Listing works with or without hardware; an absurd index never matches
        let Ok(devices) = list_devices() else {
            return;
        };
        let settings = CameraSettings {
            device_index: u32::MAX,
            ..CameraSettings::default()
        };
        let expected = if devices.is_empty() {
            CameraError::NoDevices
        } else {
            CameraError::DeviceNotFound(u32::MAX)
        };
        assert_eq!(HardwareSource::new(settings).unwrap_err(), expected);
    }
}
