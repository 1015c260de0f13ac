use super::Line;

/// What the user is currently doing with the route editor.
///
/// Creating and Editing are mutually exclusive: entering one force-exits the other.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditingSession {
    #[default]
    Idle,
    /// Drawing a new line; the draft is not part of the collection yet
    Creating(Line),
    /// Stations of the line at this index are draggable and deletable
    Editing(usize),
}

impl EditingSession {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_creating(&self) -> bool {
        matches!(self, Self::Creating(_))
    }

    #[must_use]
    pub const fn editing_index(&self) -> Option<usize> {
        match self {
            Self::Editing(index) => Some(*index),
            _ => None,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&Line> {
        match self {
            Self::Creating(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Line> {
        match self {
            Self::Creating(draft) => Some(draft),
            _ => None,
        }
    }

    /// Whether stations of a finalized line may be dragged or deleted
    #[must_use]
    pub const fn is_line_mutable(&self, index: usize) -> bool {
        matches!(self, Self::Editing(i) if *i == index)
    }

    /// Start drawing `draft`. Returns the index of a line whose editing was force-exited.
    pub fn begin_creating(&mut self, draft: Line) -> Option<usize> {
        let exited = self.editing_index();
        *self = Self::Creating(draft);
        exited
    }

    /// Start editing a finalized line. Returns an unfinished draft that was discarded.
    pub fn begin_editing(&mut self, index: usize) -> Option<Line> {
        match std::mem::replace(self, Self::Editing(index)) {
            Self::Creating(draft) => Some(draft),
            _ => None,
        }
    }

    /// Take the draft out, leaving the session idle. `None` (and no change) when not creating.
    pub fn take_draft(&mut self) -> Option<Line> {
        if !self.is_creating() {
            return None;
        }
        match std::mem::take(self) {
            Self::Creating(draft) => Some(draft),
            _ => None,
        }
    }

    /// Leave editing mode. `None` (and no change) when not editing.
    pub fn exit_editing(&mut self) -> Option<usize> {
        let index = self.editing_index()?;
        *self = Self::Idle;
        Some(index)
    }

    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> Line {
        Line::new_draft(name, "#123456").expect("valid draft")
    }

    #[test]
    fn test_default_is_idle() {
        assert!(EditingSession::default().is_idle());
    }

    #[test]
    fn test_creating_then_take_draft() {
        let mut session = EditingSession::Idle;
        assert_eq!(session.begin_creating(draft("L1")), None);
        assert!(session.is_creating());
        let taken = session.take_draft().expect("draft present");
        assert_eq!(taken.name, "L1");
        assert!(session.is_idle());
    }

    #[test]
    fn test_take_draft_when_editing_is_noop() {
        let mut session = EditingSession::Editing(2);
        assert!(session.take_draft().is_none());
        assert_eq!(session.editing_index(), Some(2));
    }

    #[test]
    fn test_begin_creating_force_exits_editing() {
        let mut session = EditingSession::Editing(1);
        assert_eq!(session.begin_creating(draft("L2")), Some(1));
        assert!(session.is_creating());
        assert!(!session.is_line_mutable(1));
    }

    #[test]
    fn test_begin_editing_discards_draft() {
        let mut session = EditingSession::Idle;
        session.begin_creating(draft("L1"));
        let discarded = session.begin_editing(0).expect("draft discarded");
        assert_eq!(discarded.name, "L1");
        assert_eq!(session.editing_index(), Some(0));
        assert!(session.draft().is_none());
    }

    #[test]
    fn test_line_mutability_follows_editing_index() {
        let mut session = EditingSession::Idle;
        assert!(!session.is_line_mutable(0));
        session.begin_editing(0);
        assert!(session.is_line_mutable(0));
        assert!(!session.is_line_mutable(1));
        assert_eq!(session.exit_editing(), Some(0));
        assert!(!session.is_line_mutable(0));
        assert_eq!(session.exit_editing(), None);
    }
}
