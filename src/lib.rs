//! tcpcapture streams camera frames to a remote host over a plain TCP socket.
//!
//! It provides two binaries:
//! - `tcp_capture`: captures color frames, shows a local preview and sends
//!   each frame as a length-prefixed binary message.
//! - `frame_viewer`: a reference receiver that decodes the stream and shows it.
//!
//! The crate is structured into several modules, each responsible for one
//! step of that pipeline.

/// Top-level error type for the binaries.
pub mod app_error;
/// The capture, send, pace and render loop.
pub mod capture_loop;
/// Handles configuration loading and management.
pub mod config;
/// Local preview window and its key bindings.
pub mod display;
/// Wire format of a frame message: encoder, decoder and errors.
pub mod frame_proto;
/// Camera devices and the synthetic test source.
pub mod frame_source;
/// Logging utilities for the application.
pub mod log;
/// Blocking TCP sender and pacing.
pub mod stream_sender;
/// Clock helpers.
pub mod utils;
/// Reference receiver and its window.
pub mod viewer;
