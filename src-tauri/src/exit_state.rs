#[derive(Debug, Default)]
pub(crate) struct ExitStateMachine {
    quitting: bool,
    cleanup_started: bool,
}

impl ExitStateMachine {
    pub(crate) fn mark_quitting(&mut self) {
        self.quitting = true;
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting
    }

    // `true` exactly once per process.
    pub(crate) fn try_begin_cleanup(&mut self) -> bool {
        if self.cleanup_started {
            return false;
        }
        self.cleanup_started = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::ExitStateMachine;

    #[test]
    fn quitting_flag_is_sticky() {
        let mut state = ExitStateMachine::default();
        assert!(!state.is_quitting());
        state.mark_quitting();
        state.mark_quitting();
        assert!(state.is_quitting());
    }

    #[test]
    fn cleanup_begins_only_once() {
        let mut state = ExitStateMachine::default();
        assert!(state.try_begin_cleanup());
        assert!(!state.try_begin_cleanup());
    }
}
