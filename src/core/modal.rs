//! Single-slot modal runner.
//!
//! Only one modal is ever outstanding. Opening one parks a continuation
//! alongside the request; the continuation is handed back, together with the
//! user's answer, by the `dismiss` carrying the matching ticket. Tickets are
//! never reused, so an answer addressed to an earlier modal cannot complete a
//! later one.

use std::path::PathBuf;

use tracing::debug;

use crate::io::DirEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Confirm,
    TextInput,
    FileOpen,
    FileSave,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalRequest {
    Confirm {
        title: String,
        message: String,
    },
    TextInput {
        title: String,
        placeholder: String,
        default: String,
    },
    FileOpen {
        start_dir: PathBuf,
        entries: Vec<DirEntry>,
    },
    FileSave {
        start_dir: PathBuf,
        default_name: String,
        entries: Vec<DirEntry>,
    },
    Info {
        title: String,
        lines: Vec<String>,
    },
}

impl ModalRequest {
    pub fn kind(&self) -> ModalKind {
        match self {
            ModalRequest::Confirm { .. } => ModalKind::Confirm,
            ModalRequest::TextInput { .. } => ModalKind::TextInput,
            ModalRequest::FileOpen { .. } => ModalKind::FileOpen,
            ModalRequest::FileSave { .. } => ModalKind::FileSave,
            ModalRequest::Info { .. } => ModalKind::Info,
        }
    }
}

/// A user's answer. A cancelled modal answers with no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalResponse {
    Confirmed(bool),
    Text(String),
    OpenTarget {
        path: PathBuf,
        encoding: Option<String>,
    },
    SaveTarget {
        dir: PathBuf,
        file_name: String,
    },
    Acknowledged,
}

impl ModalResponse {
    pub fn kind(&self) -> ModalKind {
        match self {
            ModalResponse::Confirmed(_) => ModalKind::Confirm,
            ModalResponse::Text(_) => ModalKind::TextInput,
            ModalResponse::OpenTarget { .. } => ModalKind::FileOpen,
            ModalResponse::SaveTarget { .. } => ModalKind::FileSave,
            ModalResponse::Acknowledged => ModalKind::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModalTicket(u64);

#[derive(Debug, PartialEq)]
pub enum Dismissal<C> {
    Resolved {
        continuation: C,
        response: Option<ModalResponse>,
    },
    NothingPending,
    /// The ticket belongs to a modal that is no longer current.
    Stale { ticket: ModalTicket },
    /// The response does not answer the pending request; it stays open.
    WrongKind { expected: ModalKind, got: ModalKind },
}

#[derive(Debug)]
struct Pending<C> {
    ticket: ModalTicket,
    request: ModalRequest,
    continuation: C,
}

#[derive(Debug)]
pub struct ModalStack<C> {
    issued: u64,
    pending: Option<Pending<C>>,
}

impl<C> Default for ModalStack<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ModalStack<C> {
    pub fn new() -> Self {
        Self {
            issued: 0,
            pending: None,
        }
    }

    /// Parks `continuation` until the returned ticket is dismissed.
    ///
    /// # Panics
    ///
    /// Panics if another modal is still pending; only one modal surface can
    /// be shown at a time.
    pub fn open(&mut self, request: ModalRequest, continuation: C) -> ModalTicket {
        if let Some(current) = &self.pending {
            panic!(
                "{:?} modal opened while {:?} modal {:?} is still pending",
                request.kind(),
                current.request.kind(),
                current.ticket
            );
        }
        self.issued += 1;
        let ticket = ModalTicket(self.issued);
        debug!(?ticket, kind = ?request.kind(), "modal opened");
        self.pending = Some(Pending {
            ticket,
            request,
            continuation,
        });
        ticket
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn active(&self) -> Option<(ModalTicket, &ModalRequest)> {
        self.pending.as_ref().map(|p| (p.ticket, &p.request))
    }

    pub fn continuation(&self) -> Option<&C> {
        self.pending.as_ref().map(|p| &p.continuation)
    }

    pub fn dismiss(&mut self, ticket: ModalTicket, response: Option<ModalResponse>) -> Dismissal<C> {
        let Some(current) = self.pending.as_ref() else {
            return Dismissal::NothingPending;
        };
        if current.ticket != ticket {
            debug!(?ticket, current = ?current.ticket, "stale modal result dropped");
            return Dismissal::Stale { ticket };
        }
        if let Some(resp) = &response {
            if resp.kind() != current.request.kind() {
                return Dismissal::WrongKind {
                    expected: current.request.kind(),
                    got: resp.kind(),
                };
            }
        }

        match self.pending.take() {
            Some(done) => {
                debug!(?ticket, answered = response.is_some(), "modal closed");
                Dismissal::Resolved {
                    continuation: done.continuation,
                    response,
                }
            }
            None => Dismissal::NothingPending,
        }
    }

    pub fn cancel(&mut self, ticket: ModalTicket) -> Dismissal<C> {
        self.dismiss(ticket, None)
    }
}
