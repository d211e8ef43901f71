//! Customer field schema
//!
//! Static description of every input the churn form collects. Declaration
//! order is significant: float fields, then integer fields, then
//! enumerations. The renderer and the payload builder both follow it.

/// How a field is entered and coerced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// One of a fixed list of strings; the first option is the default
    Enumeration { options: &'static [&'static str] },
    BoundedInteger { min: i64, max: i64, default: i64 },
    BoundedFloat { min: f64, max: f64, default: f64 },
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldKind::Enumeration { .. })
    }

    /// Short name used in error messages
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Enumeration { .. } => "text",
            FieldKind::BoundedInteger { .. } => "integer",
            FieldKind::BoundedFloat { .. } => "number",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDefinition {
    pub const fn enumeration(name: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            name,
            kind: FieldKind::Enumeration { options },
        }
    }

    pub const fn integer(name: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            kind: FieldKind::BoundedInteger { min, max, default },
        }
    }

    pub const fn float(name: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            kind: FieldKind::BoundedFloat { min, max, default },
        }
    }
}

/// Immutable, ordered set of field definitions
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    fields: &'static [FieldDefinition],
}

impl FieldSchema {
    pub const fn new(fields: &'static [FieldDefinition]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldDefinition] {
        self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static FieldDefinition> {
        self.fields.iter()
    }

    /// Definition for `name`
    pub fn get(&self, name: &str) -> Option<&'static FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

const YES_NO: &[&str] = &["Yes", "No"];
const NO_YES: &[&str] = &["No", "Yes"];
const NO_YES_NO_INTERNET: &[&str] = &["No", "Yes", "No internet service"];

pub const CUSTOMER_FIELDS: &[FieldDefinition] = &[
    FieldDefinition::float("MonthlyCharges", 0.0, 1000.0, 100.0),
    FieldDefinition::float("TotalCharges", 0.0, 50000.0, 1000.0),
    FieldDefinition::integer("SeniorCitizen", 0, 1, 0),
    FieldDefinition::integer("tenure", 0, 100, 2),
    FieldDefinition::enumeration("gender", &["Female", "Male"]),
    FieldDefinition::enumeration("Partner", YES_NO),
    FieldDefinition::enumeration("Dependents", NO_YES),
    FieldDefinition::enumeration("PhoneService", NO_YES),
    FieldDefinition::enumeration("MultipleLines", &["No phone service", "No", "Yes"]),
    FieldDefinition::enumeration("InternetService", &["DSL", "Fiber optic", "No"]),
    FieldDefinition::enumeration("OnlineSecurity", NO_YES_NO_INTERNET),
    FieldDefinition::enumeration("OnlineBackup", &["Yes", "No", "No internet service"]),
    FieldDefinition::enumeration("DeviceProtection", NO_YES_NO_INTERNET),
    FieldDefinition::enumeration("TechSupport", NO_YES_NO_INTERNET),
    FieldDefinition::enumeration("StreamingTV", NO_YES_NO_INTERNET),
    FieldDefinition::enumeration("StreamingMovies", NO_YES_NO_INTERNET),
    FieldDefinition::enumeration("Contract", &["Month-to-month", "One year", "Two year"]),
    FieldDefinition::enumeration("PaperlessBilling", YES_NO),
    FieldDefinition::enumeration(
        "PaymentMethod",
        &[
            "Electronic check",
            "Mailed check",
            "Bank transfer (automatic)",
            "Credit card (automatic)",
        ],
    ),
];

/// The telecom customer schema served by the form
pub static CUSTOMER_SCHEMA: FieldSchema = FieldSchema::new(CUSTOMER_FIELDS);
