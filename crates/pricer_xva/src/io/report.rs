use std::io::{Read, Write};

use pricer_core::types::Date;

use super::error::DataError;
use super::format_date;

/// Writes one path's exposures as a single comma-separated row.
pub fn write_exposure_row<W: Write>(writer: W, values: &[f64]) -> Result<(), DataError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(values.iter().map(|v| v.to_string()))?;
    wtr.flush()?;
    Ok(())
}

/// Reads a row written by [`write_exposure_row`].
pub fn read_exposure_row<R: Read>(reader: R) -> Result<Vec<f64>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let record = reader
        .records()
        .next()
        .ok_or_else(|| DataError::Invalid("empty exposure record".to_string()))??;

    record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            field.parse::<f64>().map_err(|_| DataError::Parse {
                line: 1,
                message: format!("column {}: invalid value '{}'", i + 1, field),
            })
        })
        .collect()
}

/// Writes a `date,epe,ene` report, one row per grid date.
///
/// # Errors
///
/// `Invalid` if the three sequences differ in length.
pub fn write_exposure_report<W: Write>(
    writer: W,
    dates: &[Date],
    epe: &[f64],
    ene: &[f64],
) -> Result<(), DataError> {
    if dates.len() != epe.len() || dates.len() != ene.len() {
        return Err(DataError::Invalid(format!(
            "report columns differ in length: {} dates, {} epe, {} ene",
            dates.len(),
            epe.len(),
            ene.len()
        )));
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "epe", "ene"])?;
    for ((date, e), n) in dates.iter().zip(epe).zip(ene) {
        wtr.write_record([format_date(*date), e.to_string(), n.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure_row_is_single_line() {
        let mut buffer = Vec::new();
        write_exposure_row(&mut buffer, &[0.0, 1250.5, -30.25]).unwrap();
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "0,1250.5,-30.25\n");
        assert_eq!(read_exposure_row(buffer.as_slice()).unwrap(), vec![0.0, 1250.5, -30.25]);
    }

    #[test]
    fn test_empty_record_rejected() {
        assert!(matches!(
            read_exposure_row("".as_bytes()),
            Err(DataError::Invalid(_))
        ));
    }

    #[test]
    fn test_report_layout() {
        let dates = [
            Date::from_ymd(2018, 12, 14).unwrap(),
            Date::from_ymd(2018, 12, 21).unwrap(),
        ];
        let mut buffer = Vec::new();
        write_exposure_report(&mut buffer, &dates, &[1.5, 2.0], &[-0.5, 0.0]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "date,epe,ene\n12/14/2018,1.5,-0.5\n12/21/2018,2,0\n"
        );
    }

    #[test]
    fn test_report_length_mismatch() {
        let dates = [Date::from_ymd(2018, 12, 14).unwrap()];
        let mut buffer = Vec::new();
        assert!(write_exposure_report(&mut buffer, &dates, &[1.0, 2.0], &[0.0]).is_err());
    }
}
