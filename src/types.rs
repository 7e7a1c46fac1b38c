// Strong typing over bare numbers. Newtypes for durations and slide geometry.
// See DESIGN.md: types

use serde::{Deserialize, Serialize};

/// Duration in milliseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Millis(u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    pub const fn new(ms: u64) -> Self {
        Millis(ms)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, other: Millis) -> Millis {
        Millis(self.0.saturating_add(other.0))
    }
}

impl From<u64> for Millis {
    fn from(ms: u64) -> Self {
        Millis(ms)
    }
}

/// Outer size of one slide, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SlideSize {
    pub width: f64,
    pub height: f64,
}

impl SlideSize {
    pub fn new(width: f64, height: f64) -> Self {
        SlideSize { width, height }
    }
}

/// Where a move should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveTarget {
    /// Advance by one step.
    Next,
    /// Go back by one step.
    Prev,
    /// Jump straight to an index. Not wrapped.
    Index(i64),
}

impl std::str::FromStr for MoveTarget {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "next" => Ok(MoveTarget::Next),
            "prev" => Ok(MoveTarget::Prev),
            other => leading_integer(other).parse::<i64>().map(MoveTarget::Index),
        }
    }
}

/// Optional sign plus the digits that follow it; `"2.5"` and `"2px"` both give `"2"`.
fn leading_integer(s: &str) -> &str {
    let sign = usize::from(s.starts_with(['-', '+']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    &s[..sign + digits]
}

/// Side effects the host has to carry out, drained with `Carousel::take_events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CarouselEvent {
    /// The transition to `index` has finished; fire the host's onSlide hook.
    Slid { index: i64 },
    /// Forward a synthetic end-of-touch to the swipe wrapper.
    TouchEnd,
    /// Attach (`bound == true`) or detach the hover listeners.
    HoverBinding { bound: bool },
}

/// Render-ready style values for the slider track.
///
/// Empty when neither field applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Styles {
    pub fn is_empty(&self) -> bool {
        self.offset_x.is_none() && self.height.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_target_parses_keywords_and_indices() {
        assert_eq!("next".parse::<MoveTarget>().unwrap(), MoveTarget::Next);
        assert_eq!("prev".parse::<MoveTarget>().unwrap(), MoveTarget::Prev);
        assert_eq!(" 4 ".parse::<MoveTarget>().unwrap(), MoveTarget::Index(4));
        assert!("sideways".parse::<MoveTarget>().is_err());
    }

    #[test]
    fn move_target_keeps_leading_integer() {
        assert_eq!("2.5".parse::<MoveTarget>().unwrap(), MoveTarget::Index(2));
        assert_eq!("3px".parse::<MoveTarget>().unwrap(), MoveTarget::Index(3));
        assert_eq!("-1".parse::<MoveTarget>().unwrap(), MoveTarget::Index(-1));
        assert!("-".parse::<MoveTarget>().is_err());
        assert!(".5".parse::<MoveTarget>().is_err());
    }

    #[test]
    fn empty_styles_serialize_to_empty_object() {
        let json = serde_json::to_string(&Styles::default()).unwrap();
        assert_eq!(json, "{}");

        let styles = Styles {
            offset_x: Some(-120.0),
            height: None,
        };
        assert_eq!(serde_json::to_string(&styles).unwrap(), r#"{"offsetX":-120.0}"#);
    }

    #[test]
    fn event_tagging() {
        let json = serde_json::to_string(&CarouselEvent::Slid { index: 2 }).unwrap();
        assert_eq!(json, r#"{"type":"Slid","index":2}"#);
    }
}
