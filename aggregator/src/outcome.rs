//! Reduction of three readings into a sum and a winner.

use crate::reading::{Number, Readings, Source};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Rock,
    Paper,
    Scissor,
    Draw,
}

impl From<Source> for Winner {
    fn from(source: Source) -> Self {
        match source {
            Source::Rock => Winner::Rock,
            Source::Paper => Winner::Paper,
            Source::Scissor => Winner::Scissor,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Winner::Rock => "rock",
            Winner::Paper => "paper",
            Winner::Scissor => "scissor",
            Winner::Draw => "draw",
        };
        f.write_str(name)
    }
}

/// Which reduction an aggregate endpoint performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Sum only.
    Sum,
    /// Sum and winner.
    Play,
}

impl Mode {
    /// The `error` field of the failure body for this endpoint.
    ///
    /// Both endpoints share the failure body's field names; only this label
    /// differs, so a failed round reads differently from a failed sum.
    pub const fn failure_label(&self) -> &'static str {
        match self {
            Mode::Sum => "Failed to calculate sum",
            Mode::Play => "Failed to play round",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    pub sum: Number,
    pub winner: Option<Winner>,
    pub readings: Readings,
}

impl Outcome {
    pub fn compute(readings: Readings, mode: Mode) -> Self {
        let winner = match mode {
            Mode::Sum => None,
            Mode::Play => Some(winner(&readings)),
        };

        Outcome {
            sum: sum(&readings),
            winner,
            readings,
        }
    }
}

pub fn sum(readings: &Readings) -> Number {
    readings.rock + readings.paper + readings.scissor
}

/// The source whose reading is strictly greater than both others.
///
/// Any tie on the maximum is a draw; there is no tie-break.
pub fn winner(readings: &Readings) -> Winner {
    let max = [readings.paper, readings.scissor]
        .into_iter()
        .fold(readings.rock, |acc, n| if n > acc { n } else { acc });

    let mut leaders = Source::ALL.iter().filter(|s| readings.get(**s) == max);
    match (leaders.next(), leaders.next()) {
        (Some(source), None) => Winner::from(*source),
        _ => Winner::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        assert_eq!(sum(&Readings::new(2, 9, 4)), Number::from(15));
        assert_eq!(sum(&Readings::new(0, 0, 0)), Number::from(0));
        assert_eq!(sum(&Readings::new(100, 250, 1)), Number::from(351));
    }

    #[test]
    fn test_strict_winner() {
        assert_eq!(winner(&Readings::new(7, 3, 3)), Winner::Rock);
        assert_eq!(winner(&Readings::new(2, 9, 4)), Winner::Paper);
        assert_eq!(winner(&Readings::new(1, 2, 3)), Winner::Scissor);
        assert_eq!(winner(&Readings::new(0, 0, 1)), Winner::Scissor);
    }

    #[test]
    fn test_ties_are_draws() {
        assert_eq!(winner(&Readings::new(5, 5, 5)), Winner::Draw);
        assert_eq!(winner(&Readings::new(5, 5, 3)), Winner::Draw);
        assert_eq!(winner(&Readings::new(5, 3, 5)), Winner::Draw);
        assert_eq!(winner(&Readings::new(3, 5, 5)), Winner::Draw);
        assert_eq!(winner(&Readings::new(0, 0, 0)), Winner::Draw);
    }

    #[test]
    fn test_tie_below_max_is_not_a_draw() {
        assert_eq!(winner(&Readings::new(3, 3, 8)), Winner::Scissor);
        assert_eq!(winner(&Readings::new(3, 8, 3)), Winner::Paper);
    }

    #[test]
    fn test_exhaustive_small_triples() {
        for r in 0..6 {
            for p in 0..6 {
                for s in 0..6 {
                    let outcome = Outcome::compute(Readings::new(r, p, s), Mode::Play);
                    assert_eq!(outcome.sum, Number::from(r + p + s));

                    let expected = if r > p && r > s {
                        Winner::Rock
                    } else if p > r && p > s {
                        Winner::Paper
                    } else if s > r && s > p {
                        Winner::Scissor
                    } else {
                        Winner::Draw
                    };
                    assert_eq!(outcome.winner, Some(expected), "({r}, {p}, {s})");
                }
            }
        }
    }

    #[test]
    fn test_compute_is_pure() {
        let readings = Readings::new(4, 4, 1);
        let first = Outcome::compute(readings, Mode::Play);
        let second = Outcome::compute(readings, Mode::Play);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sum_mode_has_no_winner() {
        let outcome = Outcome::compute(Readings::new(2, 9, 4), Mode::Sum);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.sum, Number::from(15));
    }

    #[test]
    fn test_winner_serialization() {
        assert_eq!(serde_json::to_string(&Winner::Draw).unwrap(), "\"draw\"");
        assert_eq!(serde_json::to_string(&Winner::Paper).unwrap(), "\"paper\"");
        assert_eq!(Winner::Scissor.to_string(), "scissor");
    }

    #[test]
    fn test_failure_label_per_endpoint() {
        assert_eq!(Mode::Sum.failure_label(), "Failed to calculate sum");
        assert_eq!(Mode::Play.failure_label(), "Failed to play round");
    }
}
