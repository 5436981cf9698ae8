use std::fmt;

/// Coarse gender label shown in the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Woman,
    Man,
    /// Sentinel for a failed or unavailable prediction.
    Unknown,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Woman => "Woman",
            Gender::Man => "Man",
            Gender::Unknown => "Unknown",
        })
    }
}

/// Probability distribution over gender labels, as returned by a classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenderScores {
    pub woman: f32,
    pub man: f32,
}

impl GenderScores {
    /// Highest-confidence label. Ties resolve to the first label (`Woman`).
    pub fn label(&self) -> Gender {
        if self.man > self.woman {
            Gender::Man
        } else {
            Gender::Woman
        }
    }
}

/// Attendance for one user on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// The ledger exists but could not be read.
    Error,
}

impl AttendanceStatus {
    pub fn is_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttendanceStatus::Present => "Present ✔",
            AttendanceStatus::Absent => "Absent ✖",
            AttendanceStatus::Error => "Error",
        })
    }
}

/// A precomputed age estimate, or the sentinel when none is available.
#[derive(Debug, Clone, PartialEq)]
pub enum AgeEstimate {
    /// Median age as written by the estimation job, kept verbatim
    /// so `24` renders as `24` and `24.5` as `24.5`.
    Predicted(serde_json::Number),
    NotYetPredicted,
}

impl fmt::Display for AgeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeEstimate::Predicted(age) => write!(f, "{age} years"),
            AgeEstimate::NotYetPredicted => f.write_str("Not yet predicted"),
        }
    }
}

/// Bounding box for a detected face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Emotion labels produced by the simulated detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Happy,
    Sad,
    Neutral,
    Angry,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Neutral,
        Emotion::Angry,
        Emotion::Surprised,
    ];
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome of matching a face against the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    Known(String),
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_scores_argmax() {
        let scores = GenderScores { woman: 0.2, man: 0.8 };
        assert_eq!(scores.label(), Gender::Man);
        let scores = GenderScores { woman: 0.7, man: 0.3 };
        assert_eq!(scores.label(), Gender::Woman);
    }

    #[test]
    fn test_gender_scores_tie_prefers_first_label() {
        let scores = GenderScores { woman: 0.5, man: 0.5 };
        assert_eq!(scores.label(), Gender::Woman);
    }

    #[test]
    fn test_attendance_display() {
        assert_eq!(AttendanceStatus::Present.to_string(), "Present ✔");
        assert_eq!(AttendanceStatus::Absent.to_string(), "Absent ✖");
        assert_eq!(AttendanceStatus::Error.to_string(), "Error");
        assert!(AttendanceStatus::Present.is_present());
        assert!(!AttendanceStatus::Error.is_present());
    }

    #[test]
    fn test_age_display() {
        assert_eq!(AgeEstimate::Predicted(24.into()).to_string(), "24 years");
        assert_eq!(AgeEstimate::NotYetPredicted.to_string(), "Not yet predicted");
    }

    #[test]
    fn test_emotion_display() {
        assert_eq!(Emotion::Surprised.to_string(), "Surprised");
    }
}
