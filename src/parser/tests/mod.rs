//! Test fixtures for release parsing
//!
//! Fixtures mimic the layout of the census advance retail release: centred
//! titles, a month header row, one row per year, a partial current year and
//! trailing adjustment factors and footnotes.


/// A data line with twelve plausible monthly sales values
pub const FULL_YEAR_LINE: &str =
    "2021  50000.0 55000.0 60000.0 65000.0 70000.0 75000.0 80000.0 85000.0 90000.0 95000.0 91000.0 92000.0";

/// Helper to create a release text for retail trade
pub fn create_release_text() -> String {
    r#"                 ADVANCE MONTHLY SALES FOR RETAIL AND FOOD SERVICES
                  Estimated Monthly Sales for Retail Trade (44000)
                               [Millions of Dollars]

YEAR      JAN      FEB      MAR      APR      MAY      JUN      JUL      AUG      SEP      OCT      NOV      DEC    TOTAL

2021   490123   501234   512345   523456   534567   545678   556789   567890   578901   589012   590123   601234  6591352
2022   610000   611000   612000   613000   614000   615000   616000   617000   618000   619000   620000   621000  7386000
2023   630000   631000   632000   633000   634000   635000   636000   637000   638000
Seasonal factors
2022     0.95     0.96     0.97     0.98     0.99     1.00     1.01     1.02     1.03     1.04     1.05     1.06

Note: 2023 estimates are preliminary and subject to revision.
"#
    .to_string()
}
