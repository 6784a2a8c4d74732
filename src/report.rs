use std::fmt::Write;

use chrono::NaiveDate;

use crate::dashboard::Insights;
use crate::models::KpiSummary;

/// Formats a whole currency amount with thousands separators, e.g. `¥4,100,000`.
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}¥{grouped}")
}

fn millions(amount: f64) -> String {
    format!("¥{:.2}M", amount / 1_000_000.0)
}

pub fn build_report(generated_on: NaiveDate, kpis: &KpiSummary, insights: &Insights) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Business KPI Report");
    let _ = writeln!(output, "Generated on {}", generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## KPI Summary");
    let _ = writeln!(
        output,
        "- Revenue: {} (latest YoY {:.1}%, average YoY {:.1}%)",
        millions(kpis.total_revenue),
        kpis.latest_yoy_growth_pct,
        kpis.average_yoy_growth_pct
    );
    let _ = writeln!(
        output,
        "- Operating profit: {} (margin {:.1}%)",
        millions(kpis.total_operating_profit),
        kpis.operating_margin_pct
    );
    let _ = writeln!(
        output,
        "- Net profit: {} (margin {:.1}%)",
        millions(kpis.total_net_profit),
        kpis.net_margin_pct
    );
    let _ = writeln!(
        output,
        "- Customer unit price: ¥{:.2}K",
        kpis.latest_customer_unit_price
    );
    let _ = writeln!(output, "- Employees: {}", kpis.latest_employee_count);
    let _ = writeln!(
        output,
        "- Hires: {} of {} applicants (hiring rate {:.1}%)",
        kpis.total_hires, kpis.total_applicants, kpis.hiring_rate_pct
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Anomaly Detection");
    match &insights.anomalies {
        Err(err) => {
            let _ = writeln!(output, "Not available: {}.", err);
        }
        Ok(anomalies) if !anomalies.any() => {
            let _ = writeln!(output, "No anomalies detected.");
        }
        Ok(anomalies) => {
            let details = [
                &anomalies.sales_anomaly_details,
                &anomalies.profit_anomaly_details,
                &anomalies.productivity_anomaly_details,
            ];
            for detail in details.into_iter().flatten() {
                let _ = writeln!(output, "- {}", detail);
            }
            if anomalies.potential_impact > 0 {
                let _ = writeln!(
                    output,
                    "Potential impact: {}",
                    format_currency(anomalies.potential_impact)
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trend Analysis");
    match &insights.trends {
        Err(err) => {
            let _ = writeln!(output, "Not available: {}.", err);
        }
        Ok(trends) => {
            let _ = writeln!(output, "- Sales: {}", trends.sales_trend);
            let _ = writeln!(output, "- Profit: {}", trends.profit_trend);
            let _ = writeln!(output, "- Productivity: {}", trends.productivity_trend);
            let _ = writeln!(output, "- Risk level: {}", trends.risk_level);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Forecast and Recommendations");
    if let Ok(trends) = &insights.trends {
        let _ = writeln!(
            output,
            "- Next month revenue: {}",
            format_currency(trends.next_month_sales_forecast)
        );
        let _ = writeln!(
            output,
            "- Next month operating profit: {}",
            format_currency(trends.next_month_profit_forecast)
        );
        if trends.potential_loss > 0 {
            let _ = writeln!(
                output,
                "- Potential loss: {}",
                format_currency(trends.potential_loss)
            );
        }
    }

    let recommendations = insights
        .anomalies
        .as_ref()
        .map(|anomalies| anomalies.recommendations.as_slice())
        .unwrap_or_default();
    if recommendations.is_empty() {
        let _ = writeln!(output, "No recommended actions.");
    } else {
        let _ = writeln!(output);
        let _ = writeln!(output, "Recommended actions:");
        for recommendation in recommendations {
            let _ = writeln!(output, "- {}", recommendation);
        }
    }

    output
}
