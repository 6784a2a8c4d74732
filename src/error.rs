//! Error and warning types for import and analysis

use thiserror::Error;

/// Fatal to an import; the previously loaded dataset stays in place.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("CSV file contains no data rows")]
    EmptyDataset,

    #[error("missing required fields: {}", fields.join(", "))]
    MissingRequiredFields { fields: Vec<String> },

    #[error("row {row}: {field} value {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        field: String,
        value: String,
    },
}

/// Non-fatal findings raised while converting rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    #[error("legacy CSV format detected; the current format ({recommended}) is recommended")]
    LegacyFormatDetected { recommended: String },

    #[error("{period}: recruitment funnel is out of order (expected hires <= offers <= interviews <= applicants)")]
    FunnelOrderViolation { period: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} needs at least {required} monthly records, got {actual}")]
pub struct InsufficientDataError {
    pub operation: &'static str,
    pub required: usize,
    pub actual: usize,
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to parse CSV: {details}")]
    Parse { details: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Parse {
            details: err.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_lists_every_name() {
        let err = ValidationError::MissingRequiredFields {
            fields: vec!["Month".to_string(), "Total_Sales".to_string()],
        };
        assert_eq!(err.to_string(), "missing required fields: Month, Total_Sales");
    }

    #[test]
    fn warnings_render_their_context() {
        let legacy = ValidationWarning::LegacyFormatDetected {
            recommended: "Month,Applicants,Interviews,Offers,Hires".to_string(),
        };
        assert_eq!(
            legacy.to_string(),
            "legacy CSV format detected; the current format (Month,Applicants,Interviews,Offers,Hires) is recommended"
        );

        let funnel = ValidationWarning::FunnelOrderViolation {
            period: "3月".to_string(),
        };
        assert!(funnel.to_string().starts_with("3月: recruitment funnel is out of order"));
    }

    #[test]
    fn insufficient_data_reports_counts() {
        let err = InsufficientDataError {
            operation: "anomaly detection",
            required: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "anomaly detection needs at least 2 monthly records, got 1"
        );
    }

    #[test]
    fn csv_errors_become_parse_errors() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader("a,b\n1,2,3\n".as_bytes());
        let err = reader
            .records()
            .find_map(|record| record.err())
            .expect("ragged row should fail");
        let import_err = ImportError::from(err);
        assert!(matches!(import_err, ImportError::Parse { .. }));
    }
}
