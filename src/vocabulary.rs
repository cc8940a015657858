/// Schema vocabulary for convention-based column inference
///
/// Column roles are inferred from names alone: a column called `FundId` is a
/// surrogate key, `Obligations` is a monetary amount, `FundCode` is a
/// descriptive field. Matching is exact and case-sensitive.
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use crate::core::BindError;

pub const PRIMARY_KEY_NAMES: &[&str] = &[
    "PrimaryKey",
    "ID",
    "Id",
    "RowId",
    "AccountId",
    "AccountKey",
    "ActivityId",
    "AllocationId",
    "AppropriationId",
    "BudgetObjectClassId",
    "CommitmentId",
    "DivisionId",
    "EmployeeId",
    "FundId",
    "GoalId",
    "ObjectiveId",
    "ObligationId",
    "OrganizationId",
    "ProgramAreaId",
    "ProgramProjectId",
    "ReimbursementId",
    "ResourcePlanningOfficeId",
    "ResponsibilityCenterId",
    "TransferId",
];

pub const NUMERIC_FIELD_NAMES: &[&str] = &[
    "Amount",
    "Authority",
    "Available",
    "Balance",
    "Budgeted",
    "Carryover",
    "Commitments",
    "Estimate",
    "Expenditures",
    "FTE",
    "Hours",
    "Obligations",
    "OpenCommitments",
    "Outlays",
    "Posted",
    "Recoveries",
    "Reimbursements",
    "ULO",
    "UnliquidatedObligations",
    "Used",
    "WorkHours",
];

pub const GENERIC_FIELD_NAMES: &[&str] = &[
    "BFY",
    "EFY",
    "RPIO",
    "AhCode",
    "AccountCode",
    "ActivityCode",
    "BocCode",
    "BocName",
    "Code",
    "Date",
    "Description",
    "DocumentNumber",
    "DocumentType",
    "EndDate",
    "FiscalYear",
    "FundCode",
    "FundName",
    "GoalCode",
    "Name",
    "NpmCode",
    "ObjectiveCode",
    "OrgCode",
    "ProgramAreaCode",
    "ProgramAreaName",
    "ProgramProjectCode",
    "ProgramProjectName",
    "Purpose",
    "RcCode",
    "RpioCode",
    "StartDate",
    "Status",
    "Title",
    "Type",
];

static STANDARD: LazyLock<Arc<SchemaVocabulary>> = LazyLock::new(|| {
    Arc::new(SchemaVocabulary {
        primary_keys: PRIMARY_KEY_NAMES.iter().map(ToString::to_string).collect(),
        numeric_fields: NUMERIC_FIELD_NAMES.iter().map(ToString::to_string).collect(),
        fields: GENERIC_FIELD_NAMES.iter().map(ToString::to_string).collect(),
    })
});

/// Role a column plays according to the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnRole {
    PrimaryKey,
    Numeric,
    Field,
    Unrecognized,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrimaryKey => write!(f, "primary key"),
            Self::Numeric => write!(f, "numeric"),
            Self::Field => write!(f, "field"),
            Self::Unrecognized => write!(f, "-"),
        }
    }
}

/// Extra names appended to the standard vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub numeric_fields: Vec<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

impl VocabularyConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary_keys.is_empty() && self.numeric_fields.is_empty() && self.fields.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVocabulary {
    primary_keys: IndexSet<String>,
    numeric_fields: IndexSet<String>,
    fields: IndexSet<String>,
}

impl SchemaVocabulary {
    /// The built-in vocabulary, shared process-wide.
    #[must_use]
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD)
    }

    /// Builds a vocabulary; every set must be non-empty and duplicate-free.
    pub fn new<S: AsRef<str>>(
        primary_keys: &[S],
        numeric_fields: &[S],
        fields: &[S],
    ) -> Result<Self, BindError> {
        Ok(Self {
            primary_keys: name_set("primary_keys", primary_keys)?,
            numeric_fields: name_set("numeric_fields", numeric_fields)?,
            fields: name_set("fields", fields)?,
        })
    }

    /// Standard names followed by the configured extras.
    pub fn extended(extra: &VocabularyConfig) -> Result<Self, BindError> {
        let chain = |base: &[&str], more: &[String]| -> Vec<String> {
            base.iter()
                .map(ToString::to_string)
                .chain(more.iter().cloned())
                .collect()
        };
        let primary_keys = chain(PRIMARY_KEY_NAMES, &extra.primary_keys);
        let numeric_fields = chain(NUMERIC_FIELD_NAMES, &extra.numeric_fields);
        let fields = chain(GENERIC_FIELD_NAMES, &extra.fields);
        Self::new(&primary_keys[..], &numeric_fields[..], &fields[..])
    }

    #[must_use]
    pub fn is_primary_key_name(&self, name: &str) -> bool {
        self.primary_keys.contains(name)
    }

    #[must_use]
    pub fn is_numeric_field_name(&self, name: &str) -> bool {
        self.numeric_fields.contains(name)
    }

    #[must_use]
    pub fn is_recognized_field_name(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Key names win over numeric names, numeric over generic fields.
    #[must_use]
    pub fn classify(&self, name: &str) -> ColumnRole {
        if self.is_primary_key_name(name) {
            ColumnRole::PrimaryKey
        } else if self.is_numeric_field_name(name) {
            ColumnRole::Numeric
        } else if self.is_recognized_field_name(name) {
            ColumnRole::Field
        } else {
            ColumnRole::Unrecognized
        }
    }

}

fn name_set<S: AsRef<str>>(category: &'static str, names: &[S]) -> Result<IndexSet<String>, BindError> {
    if names.is_empty() {
        return Err(BindError::EmptyVocabulary(category));
    }
    let mut set = IndexSet::with_capacity(names.len());
    for name in names {
        if !set.insert(name.as_ref().to_string()) {
            return Err(BindError::DuplicateVocabularyName {
                category,
                name: name.as_ref().to_string(),
            });
        }
    }
    Ok(set)
}
