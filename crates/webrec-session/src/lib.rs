//! Recording session orchestration.
//!
//! The [`Coordinator`] owns every live [`Session`] through its
//! [`SessionRegistry`] and drives the start/stop state machine: it creates
//! run directories, starts the capture streams, tears them down in order
//! and hands each stopped run to the video composer on a detached task.
//!
//! ```text
//! start(id) -> registry.create -> network / input / frames streams
//!                              -> toggle(true) to the page
//! stop(id)  -> recording = false -> frames, motion, input released
//!           -> toggle(false) -> network released -> compose (detached)
//! ```

pub mod api;
mod coordinator;
mod error;
mod navigation;
mod registry;
mod session;

pub use api::{
    FolderSelection, OpenUrlResponse, SelectFolderResponse, StartResponse, StatusResponse,
    StopResponse, WindowStatus,
};
pub use coordinator::{Coordinator, RemoteLink, StartOutcome};
pub use error::RecorderError;
pub use navigation::validate_url;
pub use registry::{Registration, SessionRegistry};
pub use session::Session;
