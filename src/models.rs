use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Employee headcount used when a record has none (or zero) and a division
/// by headcount is required.
pub const DEFAULT_EMPLOYEE_COUNT: u32 = 1;

/// Operating profit assumed for records that carry none.
pub const DEFAULT_OPERATING_PROFIT: f64 = 0.0;

/// One parsed CSV row, header name to raw cell text.
pub type RawRow = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RecordKind {
    Sales,
    Recruitment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    pub period: String,
    pub total_revenue: f64,
    pub unit_a_revenue: Option<f64>,
    pub unit_b_revenue: Option<f64>,
    pub unit_c_revenue: Option<f64>,
    pub operating_profit: Option<f64>,
    pub net_profit: Option<f64>,
    pub employee_count: Option<u32>,
    pub customer_unit_price: Option<f64>,
    pub yoy_growth_pct: Option<f64>,
    pub mom_growth_pct: Option<f64>,
}

impl MonthlyRecord {
    pub fn operating_profit_or_default(&self) -> f64 {
        self.operating_profit.unwrap_or(DEFAULT_OPERATING_PROFIT)
    }

    /// Headcount for divisions; absent or zero falls back to
    /// [`DEFAULT_EMPLOYEE_COUNT`].
    pub fn employee_divisor(&self) -> f64 {
        match self.employee_count {
            Some(count) if count > 0 => f64::from(count),
            _ => f64::from(DEFAULT_EMPLOYEE_COUNT),
        }
    }

    pub fn revenue_per_employee(&self) -> f64 {
        self.total_revenue / self.employee_divisor()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecruitmentRecord {
    pub period: String,
    pub applicants: u32,
    pub interviews: u32,
    pub offers: u32,
    pub hires: u32,
}

impl RecruitmentRecord {
    /// `hires <= offers <= interviews <= applicants`
    pub fn funnel_is_ordered(&self) -> bool {
        self.hires <= self.offers && self.offers <= self.interviews && self.interviews <= self.applicants
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub has_sales_anomaly: bool,
    pub has_profit_anomaly: bool,
    pub has_productivity_anomaly: bool,
    pub sales_anomaly_details: Option<String>,
    pub profit_anomaly_details: Option<String>,
    pub productivity_anomaly_details: Option<String>,
    pub potential_impact: i64,
    pub recommendations: Vec<String>,
}

impl AnomalyReport {
    pub fn any(&self) -> bool {
        self.has_sales_anomaly || self.has_profit_anomaly || self.has_productivity_anomaly
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub sales_trend: Trend,
    pub profit_trend: Trend,
    pub productivity_trend: Trend,
    pub next_month_sales_forecast: i64,
    pub next_month_profit_forecast: i64,
    pub risk_level: RiskLevel,
    pub potential_loss: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_operating_profit: f64,
    pub operating_margin_pct: f64,
    pub total_net_profit: f64,
    pub net_margin_pct: f64,
    pub latest_yoy_growth_pct: f64,
    pub average_yoy_growth_pct: f64,
    pub latest_customer_unit_price: f64,
    pub latest_employee_count: u32,
    pub total_applicants: u64,
    pub total_hires: u64,
    pub hiring_rate_pct: f64,
}
