use serde::{Deserialize, Serialize};

/// Complexity tier for model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Greetings, acknowledgements, quick lookups.
    Simple,
    /// Writing, explanations, well-defined tasks.
    Standard,
    /// Multi-step engineering, debugging, deep analysis.
    Complex,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Simple, Tier::Standard, Tier::Complex];

    /// Tier name as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Simple => "simple",
            Tier::Standard => "standard",
            Tier::Complex => "complex",
        }
    }

    /// One tier cheaper, with `Simple` as the floor.
    pub fn step_down(self) -> Self {
        match self {
            Tier::Complex => Tier::Standard,
            Tier::Standard | Tier::Simple => Tier::Simple,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(Tier::Simple),
            "standard" => Ok(Tier::Standard),
            "complex" => Ok(Tier::Complex),
            _ => Err(format!(
                "invalid tier '{s}', expected one of: simple, standard, complex"
            )),
        }
    }
}
