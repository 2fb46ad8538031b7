//! Validated Kolb answer matrix.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Number of questions in the Kolb inventory.
pub const QUESTION_COUNT: usize = 12;

/// Number of ranked options per question.
pub const OPTION_COUNT: usize = 4;

/// Required sum of each row (1 + 2 + 3 + 4).
pub const ROW_SUM: u8 = 10;

/// A 12×4 ipsative answer matrix.
///
/// Every row is a ranking of the four options, i.e. a permutation of
/// `{1, 2, 3, 4}`. Construction through [`AnswerMatrix::new`] is the only way
/// to obtain a value, so downstream code never re-validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerMatrix([[u8; OPTION_COUNT]; QUESTION_COUNT]);

impl AnswerMatrix {
    /// Validates raw rows into a typed matrix.
    ///
    /// # Errors
    ///
    /// `ValidationError` naming the first offending row when the shape is
    /// wrong, a value falls outside 1..=4, a value repeats or a row does not
    /// sum to 10.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self, ValidationError> {
        if rows.len() != QUESTION_COUNT {
            return Err(ValidationError::invalid_format(
                "answers",
                format!("expected {} rows, got {}", QUESTION_COUNT, rows.len()),
            ));
        }

        let mut matrix = [[0u8; OPTION_COUNT]; QUESTION_COUNT];
        for (index, row) in rows.iter().enumerate() {
            let field = format!("answers[{}]", index);
            if row.len() != OPTION_COUNT {
                return Err(ValidationError::invalid_format(
                    field,
                    format!("expected {} values, got {}", OPTION_COUNT, row.len()),
                ));
            }

            let mut seen = [false; OPTION_COUNT + 1];
            for &value in row {
                if !(1..=OPTION_COUNT as u8).contains(&value) {
                    return Err(ValidationError::out_of_range(
                        field,
                        1,
                        OPTION_COUNT as i64,
                        value as i64,
                    ));
                }
                if seen[value as usize] {
                    return Err(ValidationError::invalid_format(
                        field,
                        format!("value {} repeated", value),
                    ));
                }
                seen[value as usize] = true;
            }

            // Distinct values in 1..=4 over four slots always sum to 10; kept
            // as the stated row invariant.
            let sum: u8 = row.iter().sum();
            if sum != ROW_SUM {
                return Err(ValidationError::invalid_format(
                    field,
                    format!("row must sum to {}, got {}", ROW_SUM, sum),
                ));
            }

            matrix[index].copy_from_slice(row);
        }

        Ok(Self(matrix))
    }

    pub fn rows(&self) -> &[[u8; OPTION_COUNT]; QUESTION_COUNT] {
        &self.0
    }

    /// Sum of one option column across all questions.
    pub fn column_sum(&self, column: usize) -> u32 {
        self.0.iter().map(|row| row[column] as u32).sum()
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.0.iter().map(|row| row.to_vec()).collect()
    }
}

impl<'de> Deserialize<'de> for AnswerMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<u8>>::deserialize(deserializer)?;
        AnswerMatrix::new(rows).map_err(serde::de::Error::custom)
    }
}
