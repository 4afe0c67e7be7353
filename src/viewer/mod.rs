//! Reference receiver: decodes the frame stream and shows it in a window.
pub mod frame_receiver;
pub mod viewer_app;
pub mod viewer_event;
pub mod viewer_state;

pub use frame_receiver::{FrameReceiver, ReceiverSession, SessionEnd};
pub use viewer_app::ViewerApp;
pub use viewer_event::{ReceivedFrame, ViewerEvent};
pub use viewer_state::ViewerState;
