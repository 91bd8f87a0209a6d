//! Request lifecycle state shared by every screen.
//!
//! Each piece of remote data lives in a `Loadable<T>` so the UI can render
//! loading and error states uniformly instead of each screen tracking its
//! own ad hoc flags. Form submissions use the analogous `SubmitState`.

/// State of a background fetch for one slot of remote data.
#[derive(Debug, Clone, Default)]
pub enum Loadable<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request succeeded.
    Ready(T),
    /// The last request failed.
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, String>) -> Self {
        match result {
            Ok(data) => Loadable::Ready(data),
            Err(e) => Loadable::Failed(e),
        }
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Loadable::Pending)
    }
}

/// State of an in-flight create/edit form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loadable_from_result() {
        let ok: Loadable<i32> = Loadable::from_result(Ok(42));
        assert_eq!(ok.as_ready(), Some(&42));

        let err: Loadable<i32> = Loadable::from_result(Err("boom".to_string()));
        assert!(err.as_ready().is_none());
        assert!(matches!(err, Loadable::Failed(ref msg) if msg == "boom"));
    }

    #[test]
    fn test_loadable_default_is_idle() {
        let ld: Loadable<Vec<String>> = Loadable::default();
        assert!(matches!(ld, Loadable::Idle));
        assert!(!ld.is_pending());
    }

    #[test]
    fn test_submit_state() {
        assert!(SubmitState::Submitting.is_submitting());
        assert!(!SubmitState::Idle.is_submitting());
        assert_eq!(SubmitState::default(), SubmitState::Idle);
    }
}
