use tracing::{debug, info};

use crate::config::{AnalyticsConfig, ForecastMethod};
use crate::error::InsufficientDataError;
use crate::models::{
    AnomalyReport, KpiSummary, MonthlyRecord, RecruitmentRecord, RiskLevel, Trend, TrendReport,
};

const SALES_RECOMMENDATIONS: [&str; 2] = [
    "Review advertising spend and customer acquisition strategy.",
    "Strengthen outreach to existing customers to reduce churn.",
];
const PROFIT_RECOMMENDATIONS: [&str; 2] = [
    "Revisit the cost structure and pricing strategy.",
    "Improve operating efficiency and roll out cost reduction measures.",
];
const PRODUCTIVITY_RECOMMENDATIONS: [&str; 2] = [
    "Run productivity training for staff.",
    "Streamline workflows and review business processes.",
];

const TREND_WINDOW: usize = 3;
const LONG_WINDOW: usize = 6;

/// Division that yields 0 instead of NaN or infinity on a zero denominator.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Rounds half up to a whole currency unit.
pub fn round_currency(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn require(
    records: &[MonthlyRecord],
    required: usize,
    operation: &'static str,
) -> Result<(), InsufficientDataError> {
    if records.len() < required {
        return Err(InsufficientDataError {
            operation,
            required,
            actual: records.len(),
        });
    }
    Ok(())
}

/// Compares the last two records for sales, margin and productivity breaks.
pub fn detect_anomalies(
    records: &[MonthlyRecord],
    config: &AnalyticsConfig,
) -> Result<AnomalyReport, InsufficientDataError> {
    require(records, 2, "anomaly detection")?;
    let current = &records[records.len() - 1];
    let previous = &records[records.len() - 2];

    let mut recommendations: Vec<String> = Vec::new();
    let mut impact = 0.0;

    let sales_mom = current.mom_growth_pct.unwrap_or(0.0);
    let has_sales_anomaly = sales_mom < config.sales_drop_mom_pct;
    if has_sales_anomaly {
        impact += current.total_revenue * sales_mom.abs() / 100.0;
        push_unique(&mut recommendations, &SALES_RECOMMENDATIONS);
    }

    let current_margin =
        safe_ratio(current.operating_profit_or_default(), current.total_revenue) * 100.0;
    let previous_margin =
        safe_ratio(previous.operating_profit_or_default(), previous.total_revenue) * 100.0;
    let margin_change = current_margin - previous_margin;
    let has_profit_anomaly = margin_change < config.profit_margin_drop_pct;
    if has_profit_anomaly {
        impact += current.total_revenue * margin_change.abs() / 100.0;
        push_unique(&mut recommendations, &PROFIT_RECOMMENDATIONS);
    }

    let current_staff = f64::from(current.employee_count.unwrap_or(0));
    let previous_staff = f64::from(previous.employee_count.unwrap_or(0));
    let employee_growth = safe_ratio(current_staff - previous_staff, previous_staff) * 100.0;
    let has_productivity_anomaly = employee_growth > sales_mom * config.employee_growth_ratio;
    if has_productivity_anomaly {
        impact += safe_ratio(current.total_revenue, current_staff)
            * (employee_growth - sales_mom).abs()
            / 100.0;
        push_unique(&mut recommendations, &PRODUCTIVITY_RECOMMENDATIONS);
    }

    let report = AnomalyReport {
        has_sales_anomaly,
        has_profit_anomaly,
        has_productivity_anomaly,
        sales_anomaly_details: has_sales_anomaly
            .then(|| format!("Revenue changed {sales_mom:.1}% month over month.")),
        profit_anomaly_details: has_profit_anomaly.then(|| {
            format!(
                "Operating margin fell {:.1} points month over month.",
                margin_change.abs()
            )
        }),
        productivity_anomaly_details: has_productivity_anomaly.then(|| {
            format!(
                "Headcount growth ({employee_growth:.1}%) is well ahead of revenue growth ({sales_mom:.1}%)."
            )
        }),
        potential_impact: round_currency(impact),
        recommendations,
    };

    if report.any() {
        info!(
            period = %current.period,
            sales = has_sales_anomaly,
            profit = has_profit_anomaly,
            productivity = has_productivity_anomaly,
            impact = report.potential_impact,
            "anomalies detected"
        );
    }
    Ok(report)
}

fn push_unique(target: &mut Vec<String>, items: &[&str]) {
    for item in items {
        if !target.iter().any(|existing| existing == item) {
            target.push(item.to_string());
        }
    }
}

/// Classifies a short series by the percent change from its first to its
/// last value.
pub fn determine_trend(values: &[f64], band_pct: f64) -> Trend {
    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return Trend::Stable;
    };
    let change = safe_ratio(last - first, *first) * 100.0;

    if change > band_pct {
        Trend::Up
    } else if change < -band_pct {
        Trend::Down
    } else {
        Trend::Stable
    }
}

pub fn determine_risk_level(trends: &[Trend]) -> RiskLevel {
    match trends.iter().filter(|trend| **trend == Trend::Down).count() {
        0 => RiskLevel::Low,
        1 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// Mean of the last `period` values, or of all of them when fewer exist.
pub fn simple_moving_average(values: &[f64], period: usize) -> f64 {
    let window = &values[values.len().saturating_sub(period)..];
    if window.is_empty() {
        return 0.0;
    }
    window.iter().sum::<f64>() / window.len() as f64
}

/// One-period-ahead value from an ordinary least-squares line fitted over
/// the whole series, with x = 0, 1, ... n-1.
pub fn linear_regression_forecast(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let (numerator, denominator) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });
    let slope = safe_ratio(numerator, denominator);

    y_mean + slope * (n as f64 - x_mean)
}

pub fn forecast_next(values: &[f64], method: ForecastMethod) -> f64 {
    match method {
        ForecastMethod::MovingAverage => {
            let short = simple_moving_average(values, TREND_WINDOW);
            let long = simple_moving_average(values, LONG_WINDOW);
            // A zero long average carries no momentum signal.
            let momentum = if long == 0.0 { 1.0 } else { short / long };
            short * momentum
        }
        ForecastMethod::LinearRegression => linear_regression_forecast(values),
    }
}

pub fn analyze_trends(
    records: &[MonthlyRecord],
    config: &AnalyticsConfig,
) -> Result<TrendReport, InsufficientDataError> {
    require(records, TREND_WINDOW, "trend analysis")?;
    let recent = &records[records.len() - TREND_WINDOW..];

    let revenue: Vec<f64> = recent.iter().map(|r| r.total_revenue).collect();
    let profit: Vec<f64> = recent.iter().map(MonthlyRecord::operating_profit_or_default).collect();
    let productivity: Vec<f64> = recent.iter().map(MonthlyRecord::revenue_per_employee).collect();

    let sales_trend = determine_trend(&revenue, config.trend_band_pct);
    let profit_trend = determine_trend(&profit, config.trend_band_pct);
    let productivity_trend = determine_trend(&productivity, config.trend_band_pct);

    // The moving average only looks at the last six periods; the regression
    // uses the whole series.
    let history: &[MonthlyRecord] = match config.forecast_method {
        ForecastMethod::MovingAverage => &records[records.len().saturating_sub(LONG_WINDOW)..],
        ForecastMethod::LinearRegression => records,
    };
    let revenue_history: Vec<f64> = history.iter().map(|r| r.total_revenue).collect();
    let profit_history: Vec<f64> = history
        .iter()
        .map(MonthlyRecord::operating_profit_or_default)
        .collect();
    let sales_forecast = forecast_next(&revenue_history, config.forecast_method);
    let profit_forecast = forecast_next(&profit_history, config.forecast_method);

    let risk_level = determine_risk_level(&[sales_trend, profit_trend, productivity_trend]);
    let latest = &records[records.len() - 1];
    let potential_loss = potential_loss(latest, sales_trend, profit_trend, config);

    debug!(
        %sales_trend,
        %profit_trend,
        %productivity_trend,
        %risk_level,
        method = ?config.forecast_method,
        "trend analysis complete"
    );

    Ok(TrendReport {
        sales_trend,
        profit_trend,
        productivity_trend,
        next_month_sales_forecast: round_currency(sales_forecast),
        next_month_profit_forecast: round_currency(profit_forecast),
        risk_level,
        potential_loss: round_currency(potential_loss),
    })
}

fn potential_loss(
    latest: &MonthlyRecord,
    sales_trend: Trend,
    profit_trend: Trend,
    config: &AnalyticsConfig,
) -> f64 {
    let mut loss = 0.0;
    if sales_trend == Trend::Down {
        loss += latest.total_revenue * config.revenue_loss_rate;
    }
    if profit_trend == Trend::Down {
        loss += latest.operating_profit_or_default() * config.profit_loss_rate;
    }
    loss
}

/// Headline figures across the whole loaded dataset.
pub fn summarize_kpis(sales: &[MonthlyRecord], recruitment: &[RecruitmentRecord]) -> KpiSummary {
    let total_revenue: f64 = sales.iter().map(|r| r.total_revenue).sum();
    let total_operating_profit: f64 = sales.iter().map(MonthlyRecord::operating_profit_or_default).sum();
    let total_net_profit: f64 = sales.iter().map(|r| r.net_profit.unwrap_or(0.0)).sum();
    let yoy_total: f64 = sales.iter().map(|r| r.yoy_growth_pct.unwrap_or(0.0)).sum();

    let total_applicants: u64 = recruitment.iter().map(|r| u64::from(r.applicants)).sum();
    let total_hires: u64 = recruitment.iter().map(|r| u64::from(r.hires)).sum();

    let latest = sales.last();
    KpiSummary {
        total_revenue,
        total_operating_profit,
        operating_margin_pct: safe_ratio(total_operating_profit, total_revenue) * 100.0,
        total_net_profit,
        net_margin_pct: safe_ratio(total_net_profit, total_revenue) * 100.0,
        latest_yoy_growth_pct: latest.and_then(|r| r.yoy_growth_pct).unwrap_or(0.0),
        average_yoy_growth_pct: safe_ratio(yoy_total, sales.len() as f64),
        latest_customer_unit_price: latest.and_then(|r| r.customer_unit_price).unwrap_or(0.0),
        latest_employee_count: latest.and_then(|r| r.employee_count).unwrap_or(0),
        total_applicants,
        total_hires,
        hiring_rate_pct: safe_ratio(total_hires as f64, total_applicants as f64) * 100.0,
    }
}
