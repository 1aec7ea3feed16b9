/// Engine state definitions for tracking crawl progress
///
/// A crawl moves from `Idle` to `Running` once its queue is seeded, and ends
/// either `Completed` (queue drained or visit limit reached) or `Checkpointed`
/// (deadline hit, progress saved for the next execution cycle).
use crate::SitemapError;
use std::fmt;

/// Lifecycle of one engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Created, queue not yet seeded
    Idle,

    /// Fetching and recording links
    Running,

    // ===== Terminal States =====
    /// Queue empty or visit limit reached; counters are final
    Completed,

    /// Deadline reached; progress persisted to the checkpoint store
    Checkpointed,
}

impl EngineState {
    /// Returns true if the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Checkpointed)
    }

    /// Returns true if the transition is allowed by the state machine
    pub fn can_transition_to(&self, next: EngineState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Checkpointed)
        )
    }

    /// Moves to the next state, rejecting transitions the machine does not allow
    pub fn transition(self, next: EngineState) -> Result<EngineState, SitemapError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(SitemapError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Checkpointed => "checkpointed",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!EngineState::Idle.is_terminal());
        assert!(!EngineState::Running.is_terminal());
        assert!(EngineState::Completed.is_terminal());
        assert!(EngineState::Checkpointed.is_terminal());
    }

    #[test]
    fn test_valid_transitions() {
        let state = EngineState::Idle.transition(EngineState::Running).unwrap();
        assert_eq!(state, EngineState::Running);
        assert_eq!(
            state.transition(EngineState::Completed).unwrap(),
            EngineState::Completed
        );
        assert_eq!(
            state.transition(EngineState::Checkpointed).unwrap(),
            EngineState::Checkpointed
        );
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(EngineState::Idle.transition(EngineState::Completed).is_err());
        assert!(EngineState::Completed
            .transition(EngineState::Running)
            .is_err());
        assert!(EngineState::Checkpointed
            .transition(EngineState::Completed)
            .is_err());
        assert!(matches!(
            EngineState::Running.transition(EngineState::Idle),
            Err(SitemapError::InvalidTransition {
                from: EngineState::Running,
                to: EngineState::Idle
            })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(EngineState::Checkpointed.to_string(), "checkpointed");
    }
}
