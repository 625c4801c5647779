use std::fmt;
use std::str::FromStr;

/// Transmission medium of a physical link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Medium {
    Copper,
    Optical,
}

impl Medium {
    /// Signal propagation speed in length units per time unit.
    pub fn propagation_speed(self) -> u64 {
        match self {
            Medium::Copper => 230_000_000,
            Medium::Optical => 200_000_000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Medium::Copper => "copper",
            Medium::Optical => "optical",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, PartialEq)]
pub struct UnknownMedium(pub String);

impl fmt::Display for UnknownMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown medium '{}'", self.0)
    }
}

impl FromStr for Medium {
    type Err = UnknownMedium;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "copper" => Ok(Medium::Copper),
            "optical" | "fiber" => Ok(Medium::Optical),
            _ => Err(UnknownMedium(s.to_string())),
        }
    }
}
