use serde::Serialize;

/// Clock direction of a time entry.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Action {
    In,
    Out,
}

impl Action {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Action::In => "in",
            Action::Out => "out",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Action::In),
            "out" => Some(Action::Out),
            _ => None,
        }
    }

    /// The action that must follow this one in a well-formed sequence.
    pub fn opposite(&self) -> Self {
        match self {
            Action::In => Action::Out,
            Action::Out => Action::In,
        }
    }

    /// Next action after an optional previous entry: `in` after nothing or
    /// after `out`, otherwise `out`.
    pub fn next_after(last: Option<Action>) -> Self {
        match last {
            None | Some(Action::Out) => Action::In,
            Some(Action::In) => Action::Out,
        }
    }

    pub fn is_in(&self) -> bool {
        matches!(self, Action::In)
    }

    pub fn is_out(&self) -> bool {
        matches!(self, Action::Out)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}
