use std::io::Read;
use std::path::Path;

use pricer_core::market_data::curves::DiscountCurve;
use pricer_core::types::{Date, DayCountConvention};

use super::error::DataError;
use super::parse_date;

/// Reads a `date,discount_factor` table into a curve referenced at its
/// earliest date.
///
/// Rows may be unsorted. The discount factor at the earliest date need not
/// be one: the curve is normalised so that `P(0) = 1`.
///
/// # Examples
///
/// ```
/// use pricer_xva::io::read_discount_curve;
/// use pricer_core::market_data::curves::YieldCurve;
/// use pricer_core::types::DayCountConvention;
///
/// let data = "date,discount_factor\n12/12/2019,0.97\n12/12/2018,0.9999\n";
/// let curve = read_discount_curve(data.as_bytes(), DayCountConvention::ActualActual360).unwrap();
///
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
/// ```
pub fn read_discount_curve<R: Read>(
    reader: R,
    day_count: DayCountConvention,
) -> Result<DiscountCurve<f64>, DataError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut pillars: Vec<(Date, f64)> = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let date_field = record.get(0).ok_or_else(|| DataError::Parse {
            line,
            message: "missing date".to_string(),
        })?;
        let df_field = record.get(1).ok_or_else(|| DataError::Parse {
            line,
            message: "missing discount factor".to_string(),
        })?;

        let date = parse_date(date_field).map_err(|e| DataError::Parse {
            line,
            message: e.to_string(),
        })?;
        let df: f64 = df_field.parse().map_err(|_| DataError::Parse {
            line,
            message: format!("invalid discount factor '{}'", df_field),
        })?;
        pillars.push((date, df));
    }

    Ok(DiscountCurve::from_pillars(&pillars, day_count)?)
}

/// Opens `path` and reads it with [`read_discount_curve`].
pub fn load_discount_curve<P: AsRef<Path>>(
    path: P,
    day_count: DayCountConvention,
) -> Result<DiscountCurve<f64>, DataError> {
    let file = std::fs::File::open(path)?;
    read_discount_curve(file, day_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::MarketDataError;

    #[test]
    fn test_unsorted_rows_and_normalisation() {
        let data = "date,discount_factor\n\
                    2019-12-12,0.96\n\
                    12/12/2018,0.98\n\
                    06/12/2019,0.97\n";
        let curve = read_discount_curve(data.as_bytes(), DayCountConvention::ActualActual360)
            .unwrap();

        assert_eq!(curve.reference_date(), Date::from_ymd(2018, 12, 12).unwrap());
        let df = curve
            .discount_date(Date::from_ymd(2019, 12, 12).unwrap())
            .unwrap();
        assert_relative_eq!(df, 0.96 / 0.98, epsilon = 1e-12);
    }

    #[test]
    fn test_bad_discount_factor_reports_line() {
        let data = "date,discount_factor\n12/12/2018,1.0\n12/12/2019,abc\n";
        let err = read_discount_curve(data.as_bytes(), DayCountConvention::ActualActual360)
            .unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_non_positive_discount_factor_rejected() {
        let data = "date,discount_factor\n12/12/2018,1.0\n12/12/2019,0.0\n";
        let err = read_discount_curve(data.as_bytes(), DayCountConvention::ActualActual360)
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Curve(MarketDataError::NonPositiveDiscountFactor { .. })
        ));
    }

    #[test]
    fn test_empty_table_rejected() {
        let data = "date,discount_factor\n";
        let err = read_discount_curve(data.as_bytes(), DayCountConvention::ActualActual360)
            .unwrap_err();
        assert!(matches!(err, DataError::Curve(_)));
    }
}
