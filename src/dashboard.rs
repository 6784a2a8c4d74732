use std::io::Read;

use serde::Serialize;
use tracing::info;

use crate::analytics;
use crate::config::AnalyticsConfig;
use crate::error::{ImportError, InsufficientDataError, ValidationError, ValidationWarning};
use crate::import;
use crate::models::{
    AnomalyReport, KpiSummary, MonthlyRecord, RawRow, RecordKind, RecruitmentRecord, TrendReport,
};
use crate::normalize::{self, NormalizedDataset};
use crate::sample;

/// Derived panels for the current sales data. Each panel fails on its own
/// when the data is too short for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub anomalies: Result<AnomalyReport, InsufficientDataError>,
    pub trends: Result<TrendReport, InsufficientDataError>,
}

#[derive(Serialize)]
struct InsightsView<'a> {
    anomalies: Option<&'a AnomalyReport>,
    anomalies_error: Option<String>,
    trends: Option<&'a TrendReport>,
    trends_error: Option<String>,
}

impl Insights {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        let view = InsightsView {
            anomalies: self.anomalies.as_ref().ok(),
            anomalies_error: self.anomalies.as_ref().err().map(ToString::to_string),
            trends: self.trends.as_ref().ok(),
            trends_error: self.trends.as_ref().err().map(ToString::to_string),
        };
        serde_json::to_value(view)
    }
}

/// One session's worth of loaded data. Imports replace a dataset wholesale
/// and only when conversion succeeds.
#[derive(Debug, Clone)]
pub struct Dashboard {
    sales: Vec<MonthlyRecord>,
    recruitment: Vec<RecruitmentRecord>,
    config: AnalyticsConfig,
}

impl Dashboard {
    pub fn with_sample_data(config: AnalyticsConfig) -> Self {
        Self {
            sales: sample::sales_records(),
            recruitment: sample::recruitment_records(),
            config,
        }
    }

    pub fn sales(&self) -> &[MonthlyRecord] {
        &self.sales
    }

    pub fn recruitment(&self) -> &[RecruitmentRecord] {
        &self.recruitment
    }

    pub fn import_rows(
        &mut self,
        kind: RecordKind,
        rows: &[RawRow],
    ) -> Result<Vec<ValidationWarning>, ValidationError> {
        let dataset = normalize::normalize(kind, rows)?;
        Ok(self.replace(dataset))
    }

    pub fn import_csv<R: Read>(
        &mut self,
        kind: RecordKind,
        reader: R,
    ) -> Result<Vec<ValidationWarning>, ImportError> {
        let rows = import::read_rows(reader)?;
        Ok(self.import_rows(kind, &rows)?)
    }

    fn replace(&mut self, dataset: NormalizedDataset) -> Vec<ValidationWarning> {
        // Warnings are already logged where they are raised.
        let warnings = dataset.warnings().to_vec();
        match dataset {
            NormalizedDataset::Sales(data) => {
                info!(records = data.records.len(), "replaced sales data");
                self.sales = data.records;
            }
            NormalizedDataset::Recruitment(data) => {
                info!(records = data.records.len(), "replaced recruitment data");
                self.recruitment = data.records;
            }
        }
        warnings
    }

    pub fn insights(&self) -> Insights {
        Insights {
            anomalies: analytics::detect_anomalies(&self.sales, &self.config),
            trends: analytics::analyze_trends(&self.sales, &self.config),
        }
    }

    pub fn kpis(&self) -> KpiSummary {
        analytics::summarize_kpis(&self.sales, &self.recruitment)
    }
}
