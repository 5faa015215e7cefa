//! Seminar lifecycle engine
//!
//! Legal transitions: empty → draft and draft → archived. Archiving is
//! really "submit for generation": the caller must create a generation
//! order and the persisted state becomes `pending`, never `archived`.

use super::WorkflowError;
use crate::models::{seminar::state, Seminar};

/// A validated seminar transition, ready to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EmptyToDraft,
    /// Requires a generation order; persisted state is forced to `pending`
    DraftToArchived,
}

/// Validate a requested state change against the current state.
///
/// `None` means the request carries no state change (plain field update).
/// Anything other than `draft`/`archived` is rejected outright; a named
/// state is then checked against the two legal pairs. Self-transitions are
/// not legal.
pub fn plan_transition(
    current: &str,
    requested: Option<&str>,
) -> Result<Option<Transition>, WorkflowError> {
    let requested = match requested {
        None => return Ok(None),
        Some(s) => s,
    };

    if requested != state::DRAFT && requested != state::ARCHIVED {
        return Err(WorkflowError::InvalidArgument(
            "only 'archived' or 'draft' allowed".to_string(),
        ));
    }

    match (current, requested) {
        (c, r) if c == state::EMPTY && r == state::DRAFT => Ok(Some(Transition::EmptyToDraft)),
        (c, r) if c == state::DRAFT && r == state::ARCHIVED => {
            Ok(Some(Transition::DraftToArchived))
        }
        (from, to) => Err(WorkflowError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}

/// Apply a validated transition to the in-memory record.
///
/// For `DraftToArchived` the caller must have created the generation order
/// already; this only finalizes the record fields.
pub fn apply_transition(seminar: &mut Seminar, transition: Transition) {
    match transition {
        Transition::EmptyToDraft => {
            seminar.state = state::DRAFT.to_string();
            seminar.status.step = 2;
        }
        Transition::DraftToArchived => {
            // Archiving submits for generation; the record never reads `archived`.
            seminar.state = state::PENDING.to_string();
        }
    }
}
