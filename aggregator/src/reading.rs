//! Values read from the rock, paper and scissor upstreams.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::ops::Add;

/// One of the three upstream random number providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rock,
    Paper,
    Scissor,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Rock, Source::Paper, Source::Scissor];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Source::Rock => "rock",
            Source::Paper => "paper",
            Source::Scissor => "scissor",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finite numeric value.
///
/// Integral values serialize as JSON integers so that a sum of `2 + 9 + 4`
/// renders as `15` rather than `15.0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Number(f64);

// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Number {
    /// Returns `None` for NaN and infinities.
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then_some(Number(value))
    }

    /// Interprets a JSON value as a number.
    ///
    /// Numbers are taken as is. Strings are trimmed and parsed, so `"7"` and
    /// `" 7.5 "` are accepted. Empty strings, booleans, null, arrays and objects
    /// are rejected.
    pub fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().and_then(Number::new),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().and_then(Number::new)
            }
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i64> {
        (self.0.fract() == 0.0 && self.0.abs() <= MAX_SAFE_INTEGER).then_some(self.0 as i64)
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        Number(self.0 + rhs.0)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number(f64::from(value))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(i) => write!(f, "{i}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.0),
        }
    }
}

/// The value returned by a single upstream for one aggregate request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpstreamReading {
    pub source: Source,
    pub value: Number,
}

/// One reading from each upstream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Readings {
    pub rock: Number,
    pub paper: Number,
    pub scissor: Number,
}

impl Readings {
    pub fn new(
        rock: impl Into<Number>,
        paper: impl Into<Number>,
        scissor: impl Into<Number>,
    ) -> Self {
        Readings {
            rock: rock.into(),
            paper: paper.into(),
            scissor: scissor.into(),
        }
    }

    /// Assembles readings collected in arbitrary order.
    ///
    /// Returns `None` unless every source is present. A later reading for a
    /// source replaces an earlier one.
    pub fn from_readings(readings: impl IntoIterator<Item = UpstreamReading>) -> Option<Self> {
        let (mut rock, mut paper, mut scissor) = (None, None, None);
        for reading in readings {
            let slot = match reading.source {
                Source::Rock => &mut rock,
                Source::Paper => &mut paper,
                Source::Scissor => &mut scissor,
            };
            *slot = Some(reading.value);
        }

        Some(Readings {
            rock: rock?,
            paper: paper?,
            scissor: scissor?,
        })
    }

    pub fn get(&self, source: Source) -> Number {
        match source {
            Source::Rock => self.rock,
            Source::Paper => self.paper,
            Source::Scissor => self.scissor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(Number::coerce(&json!(7)), Some(Number::from(7)));
        assert_eq!(Number::coerce(&json!(0)), Some(Number::from(0)));
        assert_eq!(Number::coerce(&json!(2.5)), Number::new(2.5));
        assert_eq!(Number::coerce(&json!(-3)), Some(Number::from(-3)));
    }

    #[test]
    fn test_coerce_numeric_strings() {
        assert_eq!(Number::coerce(&json!("42")), Some(Number::from(42)));
        assert_eq!(Number::coerce(&json!(" 8 ")), Some(Number::from(8)));
        assert_eq!(Number::coerce(&json!("1.5")), Number::new(1.5));
    }

    #[test]
    fn test_coerce_rejects_non_numbers() {
        assert_eq!(Number::coerce(&json!("")), None);
        assert_eq!(Number::coerce(&json!("   ")), None);
        assert_eq!(Number::coerce(&json!("seven")), None);
        assert_eq!(Number::coerce(&json!("NaN")), None);
        assert_eq!(Number::coerce(&json!("inf")), None);
        assert_eq!(Number::coerce(&json!(true)), None);
        assert_eq!(Number::coerce(&json!(null)), None);
        assert_eq!(Number::coerce(&json!([1])), None);
        assert_eq!(Number::coerce(&json!({"number": 1})), None);
    }

    #[test]
    fn test_serialize_integral_as_integer() {
        assert_eq!(serde_json::to_string(&Number::from(15)).unwrap(), "15");
        assert_eq!(serde_json::to_string(&Number::new(2.5).unwrap()).unwrap(), "2.5");
        assert_eq!(Number::from(15).to_string(), "15");
        assert_eq!(Number::new(0.5).unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_from_readings() {
        let readings = Readings::from_readings([
            UpstreamReading {
                source: Source::Scissor,
                value: Number::from(4),
            },
            UpstreamReading {
                source: Source::Rock,
                value: Number::from(2),
            },
            UpstreamReading {
                source: Source::Paper,
                value: Number::from(9),
            },
        ])
        .unwrap();
        assert_eq!(readings, Readings::new(2, 9, 4));
        assert_eq!(readings.get(Source::Paper), Number::from(9));

        let missing = Readings::from_readings([
            UpstreamReading {
                source: Source::Rock,
                value: Number::from(2),
            },
            UpstreamReading {
                source: Source::Paper,
                value: Number::from(9),
            },
        ]);
        assert_eq!(missing, None);
    }

    #[test]
    fn test_source_names() {
        let names: Vec<_> = Source::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["rock", "paper", "scissor"]);
        assert_eq!(serde_json::to_string(&Source::Scissor).unwrap(), "\"scissor\"");
    }
}
