//! Record types for webrec.
//!
//! Everything a session persists is one of:
//! - [`EventRecord`]: a line of `events.ndjson`, built from a [`RemotePayload`]
//!   pushed by the monitored page or from host-level keyboard input.
//! - [`NetworkRecord`]: a line of `network.ndjson`.
//! - a numbered PNG in the frames directory (see [`frame`]).

pub mod event;
pub mod frame;
pub mod input;
pub mod layout;
pub mod network;
pub mod text;

pub use event::{kinds, EventRecord, RemotePayload};
pub use frame::{frame_file_name, parse_frame_index, FRAME_EXTENSION, FRAME_PATTERN};
pub use input::{KeyAction, KeyModifiers, RawKeyInput};
pub use layout::{run_dir_name, RunPaths};
pub use network::{NetworkCompletion, NetworkRecord};
pub use text::truncate_text;
