mod buffer;
mod commands;
mod gate;
mod modal;
mod notify;
mod session;
mod status;
mod workflow;

pub use buffer::{Cursor, TextBuffer};
pub use commands::{Command, Menu};
pub use modal::{ModalRequest, ModalResponse, ModalTicket};
pub use notify::{NotificationSink, Severity};
pub use status::StatusProjection;
pub use workflow::{Submission, WorkflowController};

#[cfg(test)]
pub(crate) use modal::ModalStack;
#[cfg(test)]
pub(crate) use session::DocumentSession;
#[cfg(test)]
pub(crate) use workflow::{ExitReason, WorkflowState};
