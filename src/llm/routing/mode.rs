//! Routing mode and the process-wide mode cell.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Cost/quality stance that selects which preference lists are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    Eco,
    #[default]
    Standard,
    Performance,
}

impl RoutingMode {
    pub const ALL: [RoutingMode; 3] = [Self::Eco, Self::Standard, Self::Performance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eco => "eco",
            Self::Standard => "standard",
            Self::Performance => "performance",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Eco,
            2 => Self::Performance,
            _ => Self::Standard,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Eco => 0,
            Self::Standard => 1,
            Self::Performance => 2,
        }
    }
}

impl std::str::FromStr for RoutingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eco" | "economy" => Ok(Self::Eco),
            "standard" | "balanced" => Ok(Self::Standard),
            "performance" | "perf" => Ok(Self::Performance),
            _ => Err(format!(
                "invalid routing mode '{s}', expected one of: eco, standard, performance"
            )),
        }
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current routing mode, shared by every request path.
///
/// Reads are lock-free. Writes go through [`ModeCell::set`] so every change
/// is logged.
#[derive(Debug)]
pub struct ModeCell {
    current: AtomicU8,
}

impl ModeCell {
    pub fn new(mode: RoutingMode) -> Self {
        Self {
            current: AtomicU8::new(mode.to_u8()),
        }
    }

    pub fn get(&self) -> RoutingMode {
        RoutingMode::from_u8(self.current.load(Ordering::Acquire))
    }

    /// Replace the current mode, returning the previous one.
    pub fn set(&self, mode: RoutingMode) -> RoutingMode {
        let previous = RoutingMode::from_u8(self.current.swap(mode.to_u8(), Ordering::AcqRel));
        if previous != mode {
            tracing::info!(from = %previous, to = %mode, "Routing mode changed");
        }
        previous
    }
}

impl Default for ModeCell {
    fn default() -> Self {
        Self::new(RoutingMode::default())
    }
}
