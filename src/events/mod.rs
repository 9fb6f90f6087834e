//! # Events Module
//!
//! Progress reporting for any front end.
//!
//! ## Design
//! The core emits events through a channel; the CLI listens on another
//! thread to drive its progress bar. Per-item problems (unrecognized files,
//! dangling album references, failed transfers) are emitted as they occur.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Transfer(TransferEvent::Failed { photo_id, message }) = event {
//!             eprintln!("{}: {}", photo_id, message);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
