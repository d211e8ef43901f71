//! Scoring payload and result models
//!
//! Request envelope:  `{"input_data":[{"fields":[..],"values":[[..]]}]}`
//! Response envelope: `{"predictions":[{"fields":[..],"values":[[..]]}]}`

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ScoringError};

/// Result field holding the predicted class label
pub const PREDICTED_LABEL_FIELD: &str = "predictedLabel";

/// Result field holding the `[no churn, churn]` probability pair
pub const PROBABILITY_FIELD: &str = "probability";

const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// One coerced feature value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoringValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScoringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringValue::Integer(v) => write!(f, "{}", v),
            ScoringValue::Float(v) => write!(f, "{}", v),
            ScoringValue::Text(v) => f.write_str(v),
        }
    }
}

/// Field names and one row of values, kept parallel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringPayload {
    fields: Vec<String>,
    values: Vec<ScoringValue>,
}

impl ScoringPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append a field and its value at the same position
    pub fn push(&mut self, field: impl Into<String>, value: ScoringValue) {
        self.fields.push(field.into());
        self.values.push(value);
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn values(&self) -> &[ScoringValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value submitted for `field`
    pub fn get(&self, field: &str) -> Option<&ScoringValue> {
        self.fields
            .iter()
            .position(|f| f == field)
            .map(|idx| &self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoringValue)> {
        self.fields.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Wire envelope for this payload
    pub fn to_request(&self) -> ScoringRequest<'_> {
        ScoringRequest {
            input_data: vec![InputData {
                fields: &self.fields,
                values: vec![&self.values],
            }],
        }
    }
}

/// Request body sent to the scorer
#[derive(Debug, Serialize)]
pub struct ScoringRequest<'a> {
    pub input_data: Vec<InputData<'a>>,
}

#[derive(Debug, Serialize)]
pub struct InputData<'a> {
    pub fields: &'a [String],
    pub values: Vec<&'a [ScoringValue]>,
}

/// Response body returned by the scorer
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringResponse {
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub fields: Vec<String>,
    pub values: Vec<Vec<Value>>,
}

impl ScoringResponse {
    /// Zip the first prediction's field names with its first row
    pub fn into_result(self) -> Result<ScoringResult> {
        let prediction = self
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| ScoringError::response_format("response contains no predictions"))?;

        let row = prediction
            .values
            .into_iter()
            .next()
            .ok_or_else(|| ScoringError::response_format("first prediction contains no values"))?;

        let fields: Map<String, Value> = prediction.fields.into_iter().zip(row).collect();
        ScoringResult::from_fields(fields)
    }
}

/// Fields of the first prediction, with the two the presenter needs already extracted
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResult {
    fields: Map<String, Value>,
    predicted_label: String,
    probability: [f64; 2],
}

impl ScoringResult {
    /// Build a result, requiring a string `predictedLabel` and a two-number `probability`
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self> {
        let predicted_label = fields
            .get(PREDICTED_LABEL_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ScoringError::response_format(format!("result has no string '{}'", PREDICTED_LABEL_FIELD))
            })?
            .to_string();

        let probability = match fields.get(PROBABILITY_FIELD).and_then(Value::as_array) {
            Some(pair) if pair.len() == 2 => {
                let no = pair[0].as_f64().filter(|p| p.is_finite());
                let yes = pair[1].as_f64().filter(|p| p.is_finite());
                match (no, yes) {
                    (Some(no), Some(yes)) => [no, yes],
                    _ => {
                        return Err(ScoringError::response_format(format!(
                            "'{}' must contain two numbers",
                            PROBABILITY_FIELD
                        )))
                    }
                }
            }
            _ => {
                return Err(ScoringError::response_format(format!(
                    "result has no two-element '{}'",
                    PROBABILITY_FIELD
                )))
            }
        };

        let sum = probability[0] + probability[1];
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            warn!("Probabilities {:?} sum to {} instead of 1.0", probability, sum);
        }

        Ok(Self {
            fields,
            predicted_label,
            probability,
        })
    }

    pub fn predicted_label(&self) -> &str {
        &self.predicted_label
    }

    /// `[no churn, churn]`
    pub fn probability(&self) -> [f64; 2] {
        self.probability
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All returned fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}
