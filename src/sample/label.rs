use serde::{Serialize, Deserialize};


/// Binary class of a training sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// `+1`
    Positive,
    /// `-1`
    Negative,
}


impl Label {
    /// Returns the label as `+1.0` or `-1.0`.
    #[inline(always)]
    pub fn value(self) -> f64 {
        match self {
            Label::Positive =>  1.0,
            Label::Negative => -1.0,
        }
    }


    /// Returns the label predicted by a confidence value.
    /// A confidence of exactly `0.0` is predicted as positive.
    #[inline(always)]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.0 { Label::Positive } else { Label::Negative }
    }
}
