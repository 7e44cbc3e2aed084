use crate::line::{LineKind, LineRecord};
use crate::WrapSummary;

/// What the wrapper must write for a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Skip,
    Content { start_document: bool },
}

#[derive(Debug)]
pub struct State {
    awaiting_new_document: bool,
    summary: WrapSummary,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub fn new() -> Self {
        Self {
            awaiting_new_document: true,
            summary: WrapSummary::default(),
        }
    }

    pub fn observe(&mut self, line: &LineRecord) -> Action {
        match line.kind() {
            LineKind::Separator => {
                self.awaiting_new_document = true;
                self.summary.separators += 1;
                Action::Skip
            }
            LineKind::Blank => {
                self.summary.blank_lines += 1;
                Action::Skip
            }
            LineKind::Content => {
                let start_document = self.awaiting_new_document;
                if start_document {
                    self.awaiting_new_document = false;
                    self.summary.documents += 1;
                }
                self.summary.content_lines += 1;
                Action::Content { start_document }
            }
        }
    }

    pub fn finalize(self) -> WrapSummary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(state: &mut State, raw: &str) -> Action {
        state.observe(&LineRecord::new(raw))
    }

    #[test]
    fn first_content_line_starts_a_document() {
        let mut state = State::new();
        assert_eq!(
            feed(&mut state, "a: 1\n"),
            Action::Content {
                start_document: true
            }
        );
        assert_eq!(
            feed(&mut state, "b: 2\n"),
            Action::Content {
                start_document: false
            }
        );
    }

    #[test]
    fn blank_lines_do_not_reset_the_document() {
        let mut state = State::new();
        feed(&mut state, "a: 1\n");
        assert_eq!(feed(&mut state, "\n"), Action::Skip);
        assert_eq!(
            feed(&mut state, "b: 2\n"),
            Action::Content {
                start_document: false
            }
        );
    }

    #[test]
    fn repeated_separators_are_idempotent() {
        let mut state = State::new();
        feed(&mut state, "a: 1\n");
        feed(&mut state, "---\n");
        assert_eq!(feed(&mut state, "---\n"), Action::Skip);
        assert_eq!(
            feed(&mut state, "b: 2\n"),
            Action::Content {
                start_document: true
            }
        );

        let summary = state.finalize();
        assert_eq!(summary.documents, 2);
        assert_eq!(summary.separators, 2);
        assert_eq!(summary.content_lines, 2);
    }
}
