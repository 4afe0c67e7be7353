//! Local preview: view toggles, key handling and the window itself.
pub mod display_config;
pub mod display_error;
pub mod key_action;
pub mod panel;
pub mod preview;
pub mod preview_window;

pub use display_config::DisplayConfig;
pub use display_error::DisplayError;
pub use key_action::KeyAction;
pub use panel::{PanelImage, compose_mosaic};
pub use preview::{HeadlessPreview, Preview};
pub use preview_window::PreviewWindow;
