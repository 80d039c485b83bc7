//! Reference range evaluation.
//!
//! Lab reports print reference ranges as free text. Only three shapes are
//! recognised: `min-max`, `< max` and `> min`. Anything else, including a
//! recognised shape whose bounds do not parse as numbers, is
//! [`ReferenceRange::Unrecognised`] and never flags a value. Evaluation cannot
//! fail: a bad range must not sink the rest of an extraction.

/// A parsed reference range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceRange {
    /// `min-max`, inclusive on both ends.
    Between { min: f64, max: f64 },
    /// `< max`; the bound itself is already out of range.
    Below(f64),
    /// `> min`; the bound itself is already out of range.
    Above(f64),
    /// Empty, malformed or an unknown shape.
    Unrecognised,
}

impl ReferenceRange {
    /// Parse a free-text reference range.
    ///
    /// The input is trimmed first. A `-` anywhere takes precedence over a
    /// leading `<` or `>`, and the split happens on the first `-` only.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::Unrecognised;
        }

        if let Some((min, max)) = text.split_once('-') {
            return match (parse_bound(min), parse_bound(max)) {
                (Some(min), Some(max)) => Self::Between { min, max },
                _ => Self::Unrecognised,
            };
        }

        if let Some(max) = text.strip_prefix('<') {
            return parse_bound(max).map_or(Self::Unrecognised, Self::Below);
        }

        if let Some(min) = text.strip_prefix('>') {
            return parse_bound(min).map_or(Self::Unrecognised, Self::Above);
        }

        Self::Unrecognised
    }

    /// Returns `true` when `value` falls outside this range.
    pub fn flags(&self, value: f64) -> bool {
        match *self {
            Self::Between { min, max } => value < min || value > max,
            Self::Below(max) => value >= max,
            Self::Above(min) => value <= min,
            Self::Unrecognised => false,
        }
    }
}

fn parse_bound(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Decide whether `value` is abnormal against a textual reference range.
///
/// Empty, unrecognised or unparsable ranges are treated as normal.
pub fn is_abnormal(value: f64, reference_range: &str) -> bool {
    ReferenceRange::parse(reference_range).flags(value)
}
