//! Camera side of the capture loop: the device trait and its implementations.
pub mod camera_error;
pub mod camera_manager;
pub mod capture_device;
pub mod setup;
pub mod stream_kind;
pub mod synthetic_camera;
pub mod utils;

pub use camera_error::CameraError;
pub use camera_manager::CameraManager;
pub use capture_device::CaptureDevice;
pub use setup::prepare_device;
pub use stream_kind::{DeviceOption, StreamIntrinsics, StreamKind, StreamPreset};
pub use synthetic_camera::SyntheticCamera;
