#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    User,
    System,
}

impl Scope {
    pub fn from_system_flag(system: bool) -> Self {
        if system {
            Self::System
        } else {
            Self::User
        }
    }

    pub fn is_system(self) -> bool {
        self == Self::System
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
        }
    }

    /// Phrase used in progress messages, e.g. "Installing foo system-wide".
    pub fn install_for(self) -> &'static str {
        match self {
            Self::User => "for current user",
            Self::System => "system-wide",
        }
    }
}
