/// Errors that can occur when creating validated repertory types.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    /// The grade was outside the repertory grading scale.
    #[error("grade must be between 1 and 4, got {0}")]
    OutOfRange(u8),
}

/// Strength of a symptom-remedy association on the repertory grading scale.
///
/// This type wraps a `u8` and guarantees the value lies on the fixed scale
/// `1..=4`. Values outside the scale are rejected at construction and during
/// deserialization, so downstream code never has to re-check grade bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Grade(u8);

impl Grade {
    /// Weakest recorded association.
    pub const MIN: u8 = 1;
    /// Strongest recorded association.
    pub const MAX: u8 = 4;

    /// Creates a new `Grade` from the given value.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Grade)` if the value lies within `1..=4`, or
    /// `Err(GradeError::OutOfRange)` otherwise.
    pub fn new(value: u8) -> Result<Self, GradeError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(GradeError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the grade as a plain integer.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Grade {
    type Error = GradeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Grade::new(value)
    }
}

impl serde::Serialize for Grade {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Grade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        Grade::new(value).map_err(serde::de::Error::custom)
    }
}
