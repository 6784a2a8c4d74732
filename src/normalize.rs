//! Conversion of raw CSV rows into canonical monthly records
//!
//! Two header layouts are accepted for each record kind. The layout is
//! resolved once from the first row and every row is then read through the
//! same static column table.

use tracing::{debug, info, warn};

use crate::error::{ValidationError, ValidationWarning};
use crate::models::{MonthlyRecord, RawRow, RecordKind, RecruitmentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `Month,Total_Sales,...` / `Month,Applicants,...`
    Current,
    /// `month,total,...` / `month,applicants,...`
    Legacy,
}

struct SalesColumns {
    month: &'static str,
    total: &'static str,
    unit_a: &'static str,
    unit_b: &'static str,
    unit_c: &'static str,
    operating_profit: &'static str,
    net_profit: &'static str,
    customer_price: &'static str,
    employees: &'static str,
    yoy_growth: &'static str,
    mom_growth: &'static str,
}

impl SalesColumns {
    fn required(&self) -> [&'static str; 2] {
        [self.month, self.total]
    }
}

const CURRENT_SALES: SalesColumns = SalesColumns {
    month: "Month",
    total: "Total_Sales",
    unit_a: "Business_Unit_A",
    unit_b: "Business_Unit_B",
    unit_c: "Business_Unit_C",
    operating_profit: "Operating_Profit",
    net_profit: "Net_Profit",
    customer_price: "Customer_Price",
    employees: "Employees",
    yoy_growth: "YoY_Growth",
    mom_growth: "MoM_Growth",
};

const LEGACY_SALES: SalesColumns = SalesColumns {
    month: "month",
    total: "total",
    unit_a: "unitA",
    unit_b: "unitB",
    unit_c: "unitC",
    operating_profit: "operatingProfit",
    net_profit: "netProfit",
    customer_price: "customerPrice",
    employees: "employees",
    yoy_growth: "yoyGrowth",
    mom_growth: "momGrowth",
};

struct RecruitmentColumns {
    month: &'static str,
    applicants: &'static str,
    interviews: &'static str,
    offers: &'static str,
    hires: &'static str,
}

impl RecruitmentColumns {
    fn required(&self) -> [&'static str; 5] {
        [self.month, self.applicants, self.interviews, self.offers, self.hires]
    }
}

const CURRENT_RECRUITMENT: RecruitmentColumns = RecruitmentColumns {
    month: "Month",
    applicants: "Applicants",
    interviews: "Interviews",
    offers: "Offers",
    hires: "Hires",
};

const LEGACY_RECRUITMENT: RecruitmentColumns = RecruitmentColumns {
    month: "month",
    applicants: "applicants",
    interviews: "interviews",
    offers: "offers",
    hires: "hires",
};

const RECOMMENDED_SALES_HEADER: &str =
    "Month,Total_Sales,Business_Unit_A,Business_Unit_B,Business_Unit_C";
const RECOMMENDED_RECRUITMENT_HEADER: &str = "Month,Applicants,Interviews,Offers,Hires";

impl SourceFormat {
    fn sales_columns(self) -> &'static SalesColumns {
        match self {
            SourceFormat::Current => &CURRENT_SALES,
            SourceFormat::Legacy => &LEGACY_SALES,
        }
    }

    fn recruitment_columns(self) -> &'static RecruitmentColumns {
        match self {
            SourceFormat::Current => &CURRENT_RECRUITMENT,
            SourceFormat::Legacy => &LEGACY_RECRUITMENT,
        }
    }
}

/// Records produced from one import, with the layout that was used and any
/// non-fatal findings.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub format: SourceFormat,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedDataset {
    Sales(Normalized<MonthlyRecord>),
    Recruitment(Normalized<RecruitmentRecord>),
}

impl NormalizedDataset {
    pub fn len(&self) -> usize {
        match self {
            NormalizedDataset::Sales(data) => data.records.len(),
            NormalizedDataset::Recruitment(data) => data.records.len(),
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            NormalizedDataset::Sales(data) => data.format,
            NormalizedDataset::Recruitment(data) => data.format,
        }
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        match self {
            NormalizedDataset::Sales(data) => &data.warnings,
            NormalizedDataset::Recruitment(data) => &data.warnings,
        }
    }
}

pub fn normalize(kind: RecordKind, rows: &[RawRow]) -> Result<NormalizedDataset, ValidationError> {
    match kind {
        RecordKind::Sales => normalize_sales(rows).map(NormalizedDataset::Sales),
        RecordKind::Recruitment => normalize_recruitment(rows).map(NormalizedDataset::Recruitment),
    }
}

pub fn normalize_sales(rows: &[RawRow]) -> Result<Normalized<MonthlyRecord>, ValidationError> {
    let first = rows.first().ok_or(ValidationError::EmptyDataset)?;
    let format = detect_format(
        first,
        &CURRENT_SALES.required(),
        &LEGACY_SALES.required(),
    )?;
    let columns = format.sales_columns();

    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| sales_record(row, index + 1, columns))
        .collect::<Result<Vec<_>, _>>()?;

    let mut warnings = Vec::new();
    if format == SourceFormat::Legacy {
        warnings.push(ValidationWarning::LegacyFormatDetected {
            recommended: RECOMMENDED_SALES_HEADER.to_string(),
        });
    }

    info!(rows = records.len(), ?format, "normalized sales rows");
    Ok(Normalized {
        records,
        format,
        warnings,
    })
}

pub fn normalize_recruitment(
    rows: &[RawRow],
) -> Result<Normalized<RecruitmentRecord>, ValidationError> {
    let first = rows.first().ok_or(ValidationError::EmptyDataset)?;
    let format = detect_format(
        first,
        &CURRENT_RECRUITMENT.required(),
        &LEGACY_RECRUITMENT.required(),
    )?;
    let columns = format.recruitment_columns();

    let records = rows
        .iter()
        .enumerate()
        .map(|(index, row)| recruitment_record(row, index + 1, columns))
        .collect::<Result<Vec<_>, _>>()?;

    let mut warnings = Vec::new();
    if format == SourceFormat::Legacy {
        warnings.push(ValidationWarning::LegacyFormatDetected {
            recommended: RECOMMENDED_RECRUITMENT_HEADER.to_string(),
        });
    }
    for record in records.iter().filter(|record| !record.funnel_is_ordered()) {
        warn!(period = %record.period, "recruitment funnel out of order");
        warnings.push(ValidationWarning::FunnelOrderViolation {
            period: record.period.clone(),
        });
    }

    info!(rows = records.len(), ?format, "normalized recruitment rows");
    Ok(Normalized {
        records,
        format,
        warnings,
    })
}

/// Picks the layout whose required columns are all present in `row`.
///
/// When neither layout matches, the error lists what the current layout is
/// missing.
fn detect_format(
    row: &RawRow,
    current: &[&str],
    legacy: &[&str],
) -> Result<SourceFormat, ValidationError> {
    let missing: Vec<String> = current
        .iter()
        .filter(|field| !row.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if missing.is_empty() {
        return Ok(SourceFormat::Current);
    }

    if legacy.iter().all(|field| row.contains_key(*field)) {
        warn!("legacy CSV layout detected");
        return Ok(SourceFormat::Legacy);
    }

    Err(ValidationError::MissingRequiredFields { fields: missing })
}

fn sales_record(
    row: &RawRow,
    row_number: usize,
    columns: &SalesColumns,
) -> Result<MonthlyRecord, ValidationError> {
    Ok(MonthlyRecord {
        period: text(row, columns.month),
        total_revenue: required_number(row, row_number, columns.total)?,
        unit_a_revenue: optional_number(row, columns.unit_a),
        unit_b_revenue: optional_number(row, columns.unit_b),
        unit_c_revenue: optional_number(row, columns.unit_c),
        operating_profit: optional_number(row, columns.operating_profit),
        net_profit: optional_number(row, columns.net_profit),
        employee_count: optional_count(row, columns.employees),
        customer_unit_price: optional_number(row, columns.customer_price),
        yoy_growth_pct: optional_number(row, columns.yoy_growth),
        mom_growth_pct: optional_number(row, columns.mom_growth),
    })
}

fn recruitment_record(
    row: &RawRow,
    row_number: usize,
    columns: &RecruitmentColumns,
) -> Result<RecruitmentRecord, ValidationError> {
    Ok(RecruitmentRecord {
        period: text(row, columns.month),
        applicants: required_count(row, row_number, columns.applicants)?,
        interviews: required_count(row, row_number, columns.interviews)?,
        offers: required_count(row, row_number, columns.offers)?,
        hires: required_count(row, row_number, columns.hires)?,
    })
}

/// Strips everything except digits, the decimal point and the minus sign,
/// so `"¥1,234,000"` and `"$1,234,000"` both read as `1234000`.
pub fn clean_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

fn text(row: &RawRow, field: &str) -> String {
    row.get(field).map(|value| value.trim().to_string()).unwrap_or_default()
}

fn invalid(row_number: usize, field: &str, value: &str) -> ValidationError {
    ValidationError::InvalidNumber {
        row: row_number,
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn required_number(row: &RawRow, row_number: usize, field: &str) -> Result<f64, ValidationError> {
    let raw = row.get(field).map(String::as_str).unwrap_or_default();
    clean_numeric(raw)
        .parse::<f64>()
        .map_err(|_| invalid(row_number, field, raw))
}

/// Reads a whole, non-negative count; `"150"` and `"150.0"` are both 150.
fn parse_count(cleaned: &str) -> Option<u32> {
    let value = cleaned.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value as u32)
}

fn required_count(row: &RawRow, row_number: usize, field: &str) -> Result<u32, ValidationError> {
    let raw = row.get(field).map(String::as_str).unwrap_or_default();
    parse_count(&clean_numeric(raw)).ok_or_else(|| invalid(row_number, field, raw))
}

fn optional_number(row: &RawRow, field: &str) -> Option<f64> {
    let raw = row.get(field)?;
    let cleaned = clean_numeric(raw);
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(field, value = %raw, "ignoring unparseable optional value");
            None
        }
    }
}

fn optional_count(row: &RawRow, field: &str) -> Option<u32> {
    let raw = row.get(field)?;
    let cleaned = clean_numeric(raw);
    if cleaned.is_empty() {
        return None;
    }
    let count = parse_count(&cleaned);
    if count.is_none() {
        debug!(field, value = %raw, "ignoring unparseable optional count");
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_clean_numeric_strips_currency_formatting() {
        assert_eq!(clean_numeric("¥1,234,000"), "1234000");
        assert_eq!(clean_numeric("$2,600,000.50"), "2600000.50");
        assert_eq!(clean_numeric("-3.5%"), "-3.5");
        assert_eq!(clean_numeric(""), "");
    }

    #[test]
    fn test_current_sales_format() {
        let rows = vec![row(&[
            ("Month", "1月"),
            ("Total_Sales", "¥2,600,000"),
            ("Business_Unit_A", "1,200,000"),
            ("Business_Unit_B", "800,000"),
            ("Business_Unit_C", "600,000"),
            ("MoM_Growth", "1.2"),
        ])];

        let normalized = normalize_sales(&rows).unwrap();
        assert_eq!(normalized.format, SourceFormat::Current);
        assert!(normalized.warnings.is_empty());

        let record = &normalized.records[0];
        assert_eq!(record.period, "1月");
        assert_eq!(record.total_revenue, 2_600_000.0);
        assert_eq!(record.unit_a_revenue, Some(1_200_000.0));
        assert_eq!(record.mom_growth_pct, Some(1.2));
        assert_eq!(record.yoy_growth_pct, None);
        assert_eq!(record.operating_profit, None);
    }

    #[test]
    fn test_legacy_sales_format_matches_current() {
        let current = vec![
            row(&[
                ("Month", "1月"),
                ("Total_Sales", "2600000"),
                ("Business_Unit_A", "1200000"),
                ("Business_Unit_B", "800000"),
                ("Business_Unit_C", "600000"),
                ("Operating_Profit", "520000"),
                ("Employees", "1200"),
                ("YoY_Growth", "5.2"),
                ("MoM_Growth", "1.2"),
            ]),
            row(&[
                ("Month", "2月"),
                ("Total_Sales", "2800000"),
                ("Business_Unit_A", "1320000"),
                ("Business_Unit_B", "850000"),
                ("Business_Unit_C", "630000"),
                ("Operating_Profit", "560000"),
                ("Employees", "1210"),
                ("YoY_Growth", "6.8"),
                ("MoM_Growth", "7.7"),
            ]),
        ];
        let legacy = vec![
            row(&[
                ("month", "1月"),
                ("total", "2600000"),
                ("unitA", "1200000"),
                ("unitB", "800000"),
                ("unitC", "600000"),
                ("operatingProfit", "520000"),
                ("employees", "1200"),
                ("yoyGrowth", "5.2"),
                ("momGrowth", "1.2"),
            ]),
            row(&[
                ("month", "2月"),
                ("total", "2800000"),
                ("unitA", "1320000"),
                ("unitB", "850000"),
                ("unitC", "630000"),
                ("operatingProfit", "560000"),
                ("employees", "1210"),
                ("yoyGrowth", "6.8"),
                ("momGrowth", "7.7"),
            ]),
        ];

        let from_current = normalize_sales(&current).unwrap();
        let from_legacy = normalize_sales(&legacy).unwrap();
        assert_eq!(from_current.records, from_legacy.records);
        assert_eq!(from_legacy.format, SourceFormat::Legacy);
        assert_eq!(
            from_legacy.warnings,
            vec![ValidationWarning::LegacyFormatDetected {
                recommended: RECOMMENDED_SALES_HEADER.to_string()
            }]
        );
    }

    #[test]
    fn test_empty_dataset() {
        assert_eq!(normalize_sales(&[]), Err(ValidationError::EmptyDataset));
        assert_eq!(
            normalize_recruitment(&[]),
            Err(ValidationError::EmptyDataset)
        );
    }

    #[test]
    fn test_missing_required_fields_lists_current_names() {
        let rows = vec![row(&[("Month", "1月"), ("Revenue", "100")])];
        let err = normalize_sales(&rows).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredFields {
                fields: vec!["Total_Sales".to_string()]
            }
        );
    }

    #[test]
    fn test_missing_recruitment_fields() {
        let rows = vec![row(&[("Month", "1月"), ("Applicants", "150")])];
        let err = normalize_recruitment(&rows).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredFields {
                fields: vec![
                    "Interviews".to_string(),
                    "Offers".to_string(),
                    "Hires".to_string()
                ]
            }
        );
    }

    #[test]
    fn test_invalid_required_number() {
        let rows = vec![
            row(&[("Month", "1月"), ("Total_Sales", "100")]),
            row(&[("Month", "2月"), ("Total_Sales", "n/a")]),
        ];
        let err = normalize_sales(&rows).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                row: 2,
                field: "Total_Sales".to_string(),
                value: "n/a".to_string()
            }
        );
    }

    #[test]
    fn test_blank_optional_values_are_absent() {
        let rows = vec![row(&[
            ("Month", "1月"),
            ("Total_Sales", "100"),
            ("Operating_Profit", ""),
            ("Employees", "many"),
        ])];
        let record = &normalize_sales(&rows).unwrap().records[0];
        assert_eq!(record.operating_profit, None);
        assert_eq!(record.employee_count, None);
    }

    #[test]
    fn test_recruitment_preserves_order() {
        let rows = vec![
            row(&[
                ("Month", "1月"),
                ("Applicants", "150"),
                ("Interviews", "75"),
                ("Offers", "30"),
                ("Hires", "25"),
            ]),
            row(&[
                ("Month", "2月"),
                ("Applicants", "1,165"),
                ("Interviews", "82"),
                ("Offers", "33"),
                ("Hires", "28"),
            ]),
        ];
        let normalized = normalize_recruitment(&rows).unwrap();
        let periods: Vec<&str> = normalized
            .records
            .iter()
            .map(|record| record.period.as_str())
            .collect();
        assert_eq!(periods, vec!["1月", "2月"]);
        assert_eq!(normalized.records[1].applicants, 1165);
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn test_decimal_formatted_counts() {
        let rows = vec![row(&[
            ("Month", "1月"),
            ("Applicants", "150.0"),
            ("Interviews", "75.00"),
            ("Offers", "30"),
            ("Hires", "25.0"),
        ])];
        let record = &normalize_recruitment(&rows).unwrap().records[0];
        assert_eq!(record.applicants, 150);
        assert_eq!(record.interviews, 75);
        assert_eq!(record.hires, 25);

        let sales = vec![row(&[
            ("Month", "1月"),
            ("Total_Sales", "100"),
            ("Employees", "1,200.0"),
        ])];
        assert_eq!(normalize_sales(&sales).unwrap().records[0].employee_count, Some(1200));
    }

    #[test]
    fn test_fractional_or_negative_counts_are_rejected() {
        let rows = vec![row(&[
            ("Month", "1月"),
            ("Applicants", "150.5"),
            ("Interviews", "75"),
            ("Offers", "30"),
            ("Hires", "25"),
        ])];
        let err = normalize_recruitment(&rows).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                row: 1,
                field: "Applicants".to_string(),
                value: "150.5".to_string()
            }
        );

        let rows = vec![row(&[
            ("Month", "1月"),
            ("Applicants", "150"),
            ("Interviews", "75"),
            ("Offers", "30"),
            ("Hires", "-2"),
        ])];
        assert!(normalize_recruitment(&rows).is_err());
    }

    #[test]
    fn test_funnel_violation_is_a_warning() {
        let rows = vec![row(&[
            ("month", "3月"),
            ("applicants", "10"),
            ("interviews", "20"),
            ("offers", "5"),
            ("hires", "2"),
        ])];
        let normalized = normalize_recruitment(&rows).unwrap();
        assert_eq!(normalized.records.len(), 1);
        assert!(normalized
            .warnings
            .contains(&ValidationWarning::FunnelOrderViolation {
                period: "3月".to_string()
            }));
        assert!(normalized
            .warnings
            .iter()
            .any(|w| matches!(w, ValidationWarning::LegacyFormatDetected { .. })));
    }

    #[test]
    fn test_normalize_dispatches_by_kind() {
        let rows = vec![row(&[("Month", "1月"), ("Total_Sales", "100")])];
        let dataset = normalize(RecordKind::Sales, &rows).unwrap();
        assert!(matches!(dataset, NormalizedDataset::Sales(_)));
        assert_eq!(dataset.len(), 1);
        assert!(normalize(RecordKind::Recruitment, &rows).is_err());
    }
}
