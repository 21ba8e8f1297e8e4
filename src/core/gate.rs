//! Confirmation gate in front of actions that throw away the buffer.

use super::modal::{ModalRequest, ModalResponse, ModalStack, ModalTicket};
use super::session::DocumentSession;

#[derive(Debug, Clone, Copy)]
pub struct ConfirmPrompt {
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Gate<A> {
    /// Nothing to lose: run the action now.
    Proceed(A),
    /// A confirmation is pending; `hold(action)` was parked with it.
    Held(ModalTicket),
}

pub fn guard<A, C>(
    session: &DocumentSession,
    modals: &mut ModalStack<C>,
    prompt: ConfirmPrompt,
    action: A,
    hold: impl FnOnce(A) -> C,
) -> Gate<A> {
    if !session.is_dirty() {
        return Gate::Proceed(action);
    }
    let request = ModalRequest::Confirm {
        title: prompt.title.to_string(),
        message: prompt.message.to_string(),
    };
    Gate::Held(modals.open(request, hold(action)))
}

/// Gives the held action back only for an explicit yes.
pub fn release<A>(response: Option<&ModalResponse>, action: A) -> Option<A> {
    match response {
        Some(ModalResponse::Confirmed(true)) => Some(action),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfirmPrompt, Gate, guard, release};
    use crate::core::modal::{Dismissal, ModalKind, ModalResponse, ModalStack};
    use crate::core::session::DocumentSession;

    const PROMPT: ConfirmPrompt = ConfirmPrompt {
        title: "Discard changes?",
        message: "Unsaved changes will be lost.",
    };

    #[test]
    fn clean_session_runs_the_action_immediately() {
        let session = DocumentSession::new();
        let mut modals: ModalStack<&str> = ModalStack::new();
        assert_eq!(
            guard(&session, &mut modals, PROMPT, "new", |a| a),
            Gate::Proceed("new")
        );
        assert!(!modals.is_pending());
    }

    #[test]
    fn dirty_session_asks_first() {
        let mut session = DocumentSession::new();
        session.mark_dirty();
        let mut modals = ModalStack::new();

        let gate = guard(&session, &mut modals, PROMPT, "open", |a| a);
        let Gate::Held(ticket) = gate else {
            panic!("expected a confirmation");
        };
        let (active, request) = modals.active().expect("pending");
        assert_eq!(active, ticket);
        assert_eq!(request.kind(), ModalKind::Confirm);
    }

    #[test]
    fn cancelled_confirmation_never_releases_the_action() {
        let mut session = DocumentSession::new();
        session.mark_dirty();
        let mut modals = ModalStack::new();
        let mut ran = false;

        if let Gate::Held(ticket) = guard(&session, &mut modals, PROMPT, (), |a| a) {
            if let Dismissal::Resolved { continuation, response } = modals.cancel(ticket) {
                if release(response.as_ref(), continuation).is_some() {
                    ran = true;
                }
            }
        }
        assert!(!ran);
        assert!(session.is_dirty());
    }

    #[test]
    fn only_an_explicit_yes_releases() {
        assert_eq!(release(Some(&ModalResponse::Confirmed(true)), 7), Some(7));
        assert_eq!(release(Some(&ModalResponse::Confirmed(false)), 7), None);
        assert_eq!(release(None, 7), None);
    }
}
