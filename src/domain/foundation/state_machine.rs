//! Lifecycle status enums with an explicit edge list.

use super::ValidationError;

/// A status enum whose legal moves are listed once in [`successors`].
///
/// [`successors`]: StateMachine::successors
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + 'static {
    /// States reachable in one move from `self`.
    fn successors(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// Moves to `target`, or fails with `InvalidFormat` naming both states.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "status",
                format!("{:?} cannot move to {:?}", self, target),
            ));
        }
        Ok(target)
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Open,
        Shut,
        Bricked,
    }

    impl StateMachine for Door {
        fn successors(&self) -> &'static [Self] {
            match self {
                Door::Open => &[Door::Shut],
                Door::Shut => &[Door::Open, Door::Bricked],
                Door::Bricked => &[],
            }
        }
    }

    #[test]
    fn listed_edges_are_allowed() {
        assert_eq!(Door::Shut.transition_to(Door::Bricked), Ok(Door::Bricked));
    }

    #[test]
    fn unlisted_edges_name_both_states() {
        let err = Door::Open.transition_to(Door::Bricked).unwrap_err();
        assert!(err.to_string().contains("Open cannot move to Bricked"));
    }

    #[test]
    fn empty_successors_means_terminal() {
        assert!(Door::Bricked.is_terminal());
        assert!(!Door::Shut.is_terminal());
    }
}
