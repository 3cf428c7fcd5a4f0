// ============================================================
// Layer 3 - Image Edit Operations
// ============================================================
// The three manipulations a user can apply to an image before
// saving it or sending it to the classifier. Applying them is
// the data layer's job (see data::editor); this file only names
// them and parses them from the command line.

use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// 90° counter-clockwise
    RotateLeft,
    /// 90° clockwise
    RotateRight,
    /// Horizontal flip
    Mirror,
}

impl EditOp {
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::RotateLeft  => "rotate-left",
            EditOp::RotateRight => "rotate-right",
            EditOp::Mirror      => "mirror",
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Err = String so clap can use this directly as a value parser.
impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rotate-left" | "left"   => Ok(EditOp::RotateLeft),
            "rotate-right" | "right" => Ok(EditOp::RotateRight),
            "mirror" | "flip"        => Ok(EditOp::Mirror),
            other => Err(format!(
                "unknown edit '{other}' (expected rotate-left, rotate-right or mirror)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("rotate-left".parse::<EditOp>(), Ok(EditOp::RotateLeft));
        assert_eq!("Right".parse::<EditOp>(), Ok(EditOp::RotateRight));
        assert_eq!(" mirror ".parse::<EditOp>(), Ok(EditOp::Mirror));
        assert!("crop".parse::<EditOp>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for op in [EditOp::RotateLeft, EditOp::RotateRight, EditOp::Mirror] {
            assert_eq!(op.to_string().parse::<EditOp>(), Ok(op));
        }
    }
}
