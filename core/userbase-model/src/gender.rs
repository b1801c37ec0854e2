/// Gender of a user. Only these two values are ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Wire spellings of every variant, in declaration order.
    pub const CHOICES: [&'static str; 2] = ["male", "female"];

    /// Parses the exact lowercase wire spelling. Anything else yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}
