use crate::models::{MonthlyRecord, RecruitmentRecord};

/// Twelve months of bundled sales figures shown before any import.
pub fn sales_records() -> Vec<MonthlyRecord> {
    let months = vec![
        ("1月", 2_600_000.0, [1_200_000.0, 800_000.0, 600_000.0], 520_000.0, 390_000.0, 216.67, 1200, 5.2, 1.2),
        ("2月", 2_800_000.0, [1_320_000.0, 850_000.0, 630_000.0], 560_000.0, 420_000.0, 224.00, 1210, 6.8, 7.7),
        ("3月", 3_030_000.0, [1_450_000.0, 900_000.0, 680_000.0], 606_000.0, 454_500.0, 235.66, 1225, 8.2, 8.2),
        ("4月", 3_100_000.0, [1_500_000.0, 880_000.0, 720_000.0], 620_000.0, 465_000.0, 238.46, 1240, 7.5, 2.3),
        ("5月", 3_150_000.0, [1_480_000.0, 920_000.0, 750_000.0], 630_000.0, 472_500.0, 240.46, 1245, 9.0, 1.6),
        ("6月", 3_300_000.0, [1_550_000.0, 950_000.0, 800_000.0], 660_000.0, 495_000.0, 250.00, 1260, 10.5, 4.8),
        ("7月", 3_450_000.0, [1_600_000.0, 1_000_000.0, 850_000.0], 690_000.0, 517_500.0, 258.65, 1275, 12.0, 4.5),
        ("8月", 3_380_000.0, [1_580_000.0, 980_000.0, 820_000.0], 676_000.0, 507_000.0, 253.38, 1280, 9.8, -2.0),
        ("9月", 3_580_000.0, [1_650_000.0, 1_050_000.0, 880_000.0], 716_000.0, 537_000.0, 265.19, 1290, 11.5, 5.9),
        ("10月", 3_770_000.0, [1_750_000.0, 1_100_000.0, 920_000.0], 754_000.0, 565_500.0, 275.18, 1300, 13.2, 5.3),
        ("11月", 3_900_000.0, [1_800_000.0, 1_150_000.0, 950_000.0], 780_000.0, 585_000.0, 283.64, 1310, 14.0, 3.4),
        ("12月", 4_100_000.0, [1_900_000.0, 1_200_000.0, 1_000_000.0], 820_000.0, 615_000.0, 295.65, 1320, 15.5, 5.1),
    ];

    months
        .into_iter()
        .map(
            |(period, total, [unit_a, unit_b, unit_c], operating, net, price, employees, yoy, mom)| {
                MonthlyRecord {
                    period: period.to_string(),
                    total_revenue: total,
                    unit_a_revenue: Some(unit_a),
                    unit_b_revenue: Some(unit_b),
                    unit_c_revenue: Some(unit_c),
                    operating_profit: Some(operating),
                    net_profit: Some(net),
                    employee_count: Some(employees),
                    customer_unit_price: Some(price),
                    yoy_growth_pct: Some(yoy),
                    mom_growth_pct: Some(mom),
                }
            },
        )
        .collect()
}

pub fn recruitment_records() -> Vec<RecruitmentRecord> {
    let months = vec![
        ("1月", 150, 75, 30, 25),
        ("2月", 165, 82, 33, 28),
        ("3月", 180, 90, 36, 30),
        ("4月", 200, 100, 40, 35),
        ("5月", 210, 105, 42, 36),
        ("6月", 220, 110, 44, 38),
        ("7月", 240, 120, 48, 42),
        ("8月", 230, 115, 46, 40),
        ("9月", 250, 125, 50, 43),
        ("10月", 270, 135, 54, 47),
        ("11月", 280, 140, 56, 48),
        ("12月", 300, 150, 60, 52),
    ];

    months
        .into_iter()
        .map(|(period, applicants, interviews, offers, hires)| RecruitmentRecord {
            period: period.to_string(),
            applicants,
            interviews,
            offers,
            hires,
        })
        .collect()
}
