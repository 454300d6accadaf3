use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Special-cause categories a reviewer can attach to a candidate, plus the
/// automatic `CantFind` used when the reconstruction reported no bubble.
///
/// The string forms are the spellings used in the on-disk stats log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    NA,
    CantFind,
    Multi,
    Boiling,
    Giration,
    Glitch,
}

impl EventCategory {
    /// The categories reported as per-100 rates by the aggregator.
    pub const TRACKED: [EventCategory; 5] = [
        EventCategory::CantFind,
        EventCategory::Multi,
        EventCategory::Boiling,
        EventCategory::Giration,
        EventCategory::Glitch,
    ];
}

impl FromStr for EventCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NA" => Ok(Self::NA),
            "cantfind" => Ok(Self::CantFind),
            "multi" => Ok(Self::Multi),
            "boiling" => Ok(Self::Boiling),
            "giration" => Ok(Self::Giration),
            "glitch" => Ok(Self::Glitch),
            _ => Err(s.to_string()),
        }
    }
}

impl Display for EventCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NA => write!(f, "NA"),
            Self::CantFind => write!(f, "cantfind"),
            Self::Multi => write!(f, "multi"),
            Self::Boiling => write!(f, "boiling"),
            Self::Giration => write!(f, "giration"),
            Self::Glitch => write!(f, "glitch"),
        }
    }
}

/// One of the keystrokes the review loop understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewKey {
    Quit,
    Bubble,
    NoBubble,
    DoubleCount,
    Boiling,
    CameraMoved,
    Glitch,
}

impl ReviewKey {
    /// Map a raw keystroke to a review action. Unmapped keys return None and
    /// are ignored by the caller.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'q' => Some(Self::Quit),
            'y' => Some(Self::Bubble),
            'n' => Some(Self::NoBubble),
            'o' => Some(Self::DoubleCount),
            'b' => Some(Self::Boiling),
            'm' => Some(Self::CameraMoved),
            'c' => Some(Self::Glitch),
            _ => None,
        }
    }

    /// The (success, category) pair this key assigns, or None for Quit.
    pub fn label(&self) -> Option<(bool, EventCategory)> {
        match self {
            Self::Quit => None,
            Self::Bubble => Some((true, EventCategory::NA)),
            Self::NoBubble => Some((false, EventCategory::NA)),
            Self::DoubleCount => Some((true, EventCategory::Multi)),
            Self::Boiling => Some((true, EventCategory::Boiling)),
            Self::CameraMoved => Some((true, EventCategory::Giration)),
            Self::Glitch => Some((true, EventCategory::Glitch)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap() {
        assert_eq!(ReviewKey::from_char('q'), Some(ReviewKey::Quit));
        assert_eq!(
            ReviewKey::from_char('y').unwrap().label(),
            Some((true, EventCategory::NA))
        );
        assert_eq!(
            ReviewKey::from_char('n').unwrap().label(),
            Some((false, EventCategory::NA))
        );
        assert_eq!(
            ReviewKey::from_char('o').unwrap().label(),
            Some((true, EventCategory::Multi))
        );
        assert_eq!(
            ReviewKey::from_char('b').unwrap().label(),
            Some((true, EventCategory::Boiling))
        );
        assert_eq!(
            ReviewKey::from_char('m').unwrap().label(),
            Some((true, EventCategory::Giration))
        );
        assert_eq!(
            ReviewKey::from_char('c').unwrap().label(),
            Some((true, EventCategory::Glitch))
        );
        assert_eq!(ReviewKey::from_char('x'), None);
        assert_eq!(ReviewKey::from_char('Q'), None);
    }

    #[test]
    fn test_category_strings() {
        for cat in EventCategory::TRACKED {
            assert_eq!(EventCategory::from_str(&cat.to_string()), Ok(cat));
        }
        assert_eq!(EventCategory::from_str("NA"), Ok(EventCategory::NA));
        assert!(EventCategory::from_str("bogus").is_err());
    }
}
