//! Questionnaire answers, axis scores and the 4-letter personality type.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of questions in a complete questionnaire.
pub const QUESTION_COUNT: usize = 60;

/// Questions per axis pair (four contiguous ranges).
pub const QUESTIONS_PER_AXIS: u8 = 15;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

static TYPE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[EI][SN][TF][JP]$").expect("static regex"));

/// One questionnaire answer: 1 = strongly disagree, 5 = strongly agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: u8,
    #[serde(rename = "value", alias = "rating")]
    pub rating: u8,
}

impl Answer {
    pub fn new(question_id: u8, rating: u8) -> Self {
        Self {
            question_id,
            rating,
        }
    }
}

/// A complete, validated answer set: 60 answers, ids 1-60 each exactly once.
///
/// The only way to obtain one is `AnswerSet::new`, so the classifier never
/// sees partial or malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    answers: Vec<Answer>,
}

impl AnswerSet {
    pub fn new(mut answers: Vec<Answer>) -> Result<Self, ValidationError> {
        if answers.len() != QUESTION_COUNT {
            return Err(ValidationError::WrongCount {
                expected: QUESTION_COUNT,
                actual: answers.len(),
            });
        }

        let mut seen = HashSet::with_capacity(QUESTION_COUNT);
        for answer in &answers {
            if answer.question_id == 0 || usize::from(answer.question_id) > QUESTION_COUNT {
                return Err(ValidationError::QuestionOutOfRange(answer.question_id));
            }
            if !(MIN_RATING..=MAX_RATING).contains(&answer.rating) {
                return Err(ValidationError::RatingOutOfRange {
                    question_id: answer.question_id,
                    rating: answer.rating,
                });
            }
            if !seen.insert(answer.question_id) {
                return Err(ValidationError::DuplicateQuestion(answer.question_id));
            }
        }

        answers.sort_by_key(|a| a.question_id);
        Ok(Self { answers })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter()
    }

    pub fn as_slice(&self) -> &[Answer] {
        &self.answers
    }
}

/// One pole of an axis pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pole {
    E,
    I,
    S,
    N,
    T,
    F,
    J,
    P,
}

impl Pole {
    pub fn letter(self) -> char {
        match self {
            Self::E => 'E',
            Self::I => 'I',
            Self::S => 'S',
            Self::N => 'N',
            Self::T => 'T',
            Self::F => 'F',
            Self::J => 'J',
            Self::P => 'P',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'E' => Some(Self::E),
            'I' => Some(Self::I),
            'S' => Some(Self::S),
            'N' => Some(Self::N),
            'T' => Some(Self::T),
            'F' => Some(Self::F),
            'J' => Some(Self::J),
            'P' => Some(Self::P),
            _ => None,
        }
    }
}

/// The four opposing dimensions, in type-code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisPair {
    EI,
    SN,
    TF,
    JP,
}

impl AxisPair {
    pub const ALL: [AxisPair; 4] = [Self::EI, Self::SN, Self::TF, Self::JP];

    /// (first-listed pole, second-listed pole).
    pub fn poles(self) -> (Pole, Pole) {
        match self {
            Self::EI => (Pole::E, Pole::I),
            Self::SN => (Pole::S, Pole::N),
            Self::TF => (Pole::T, Pole::F),
            Self::JP => (Pole::J, Pole::P),
        }
    }
}

/// Raw per-pole rating sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisScores {
    #[serde(rename = "E")]
    pub e: u32,
    #[serde(rename = "I")]
    pub i: u32,
    #[serde(rename = "S")]
    pub s: u32,
    #[serde(rename = "N")]
    pub n: u32,
    #[serde(rename = "T")]
    pub t: u32,
    #[serde(rename = "F")]
    pub f: u32,
    #[serde(rename = "J")]
    pub j: u32,
    #[serde(rename = "P")]
    pub p: u32,
}

impl AxisScores {
    pub fn get(&self, pole: Pole) -> u32 {
        match pole {
            Pole::E => self.e,
            Pole::I => self.i,
            Pole::S => self.s,
            Pole::N => self.n,
            Pole::T => self.t,
            Pole::F => self.f,
            Pole::J => self.j,
            Pole::P => self.p,
        }
    }

    pub fn add(&mut self, pole: Pole, amount: u32) {
        let slot = match pole {
            Pole::E => &mut self.e,
            Pole::I => &mut self.i,
            Pole::S => &mut self.s,
            Pole::N => &mut self.n,
            Pole::T => &mut self.t,
            Pole::F => &mut self.f,
            Pole::J => &mut self.j,
            Pole::P => &mut self.p,
        };
        *slot += amount;
    }

    /// Normalization denominator for a pair.
    pub fn pair_total(&self, pair: AxisPair) -> u32 {
        let (a, b) = pair.poles();
        self.get(a) + self.get(b)
    }
}

/// Per-pole percentages, each rounded on its own.
///
/// The two values of a pair are not guaranteed to sum to 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisPercentages {
    #[serde(rename = "E")]
    pub e: u8,
    #[serde(rename = "I")]
    pub i: u8,
    #[serde(rename = "S")]
    pub s: u8,
    #[serde(rename = "N")]
    pub n: u8,
    #[serde(rename = "T")]
    pub t: u8,
    #[serde(rename = "F")]
    pub f: u8,
    #[serde(rename = "J")]
    pub j: u8,
    #[serde(rename = "P")]
    pub p: u8,
}

impl AxisPercentages {
    pub fn get(&self, pole: Pole) -> u8 {
        match pole {
            Pole::E => self.e,
            Pole::I => self.i,
            Pole::S => self.s,
            Pole::N => self.n,
            Pole::T => self.t,
            Pole::F => self.f,
            Pole::J => self.j,
            Pole::P => self.p,
        }
    }

    pub(crate) fn set(&mut self, pole: Pole, value: u8) {
        match pole {
            Pole::E => self.e = value,
            Pole::I => self.i = value,
            Pole::S => self.s = value,
            Pole::N => self.n = value,
            Pole::T => self.t = value,
            Pole::F => self.f = value,
            Pole::J => self.j = value,
            Pole::P => self.p = value,
        }
    }
}

/// A 4-letter type code such as `INTJ`, one pole per axis pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PersonalityType {
    poles: [Pole; 4],
}

impl PersonalityType {
    /// Build from one winning pole per pair, in EI·SN·TF·JP order.
    pub(crate) fn from_poles(poles: [Pole; 4]) -> Self {
        Self { poles }
    }

    pub fn poles(&self) -> [Pole; 4] {
        self.poles
    }

    pub fn pole(&self, pair: AxisPair) -> Pole {
        let idx = AxisPair::ALL
            .iter()
            .position(|p| *p == pair)
            .unwrap_or_default();
        self.poles[idx]
    }

    /// All 16 types, E/S/T/J-first ordering.
    pub fn all() -> Vec<PersonalityType> {
        let mut types = Vec::with_capacity(16);
        for ei in [Pole::E, Pole::I] {
            for sn in [Pole::S, Pole::N] {
                for tf in [Pole::T, Pole::F] {
                    for jp in [Pole::J, Pole::P] {
                        types.push(Self::from_poles([ei, sn, tf, jp]));
                    }
                }
            }
        }
        types
    }

    pub fn code(&self) -> String {
        self.poles.iter().map(|p| p.letter()).collect()
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for PersonalityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        if !TYPE_CODE.is_match(&upper) {
            return Err(ValidationError::InvalidType(s.to_string()));
        }

        let mut poles = [Pole::E; 4];
        for (slot, c) in poles.iter_mut().zip(upper.chars()) {
            *slot = Pole::from_letter(c).ok_or_else(|| ValidationError::InvalidType(s.to_string()))?;
        }
        Ok(Self { poles })
    }
}

impl From<PersonalityType> for String {
    fn from(t: PersonalityType) -> Self {
        t.code()
    }
}

impl TryFrom<String> for PersonalityType {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
