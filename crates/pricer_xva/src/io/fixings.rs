use std::io::{Read, Write};

use pricer_models::instruments::rates::FixingTable;

use super::error::DataError;
use super::{format_date, parse_date};

/// Writes a `date,fixing` table in date order.
pub fn write_fixings<W: Write>(writer: W, table: &FixingTable) -> Result<(), DataError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["date", "fixing"])?;
    for (date, rate) in table.iter() {
        wtr.write_record([format_date(date), rate.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a `date,fixing` table. Later duplicates overwrite earlier ones.
pub fn read_fixings<R: Read>(reader: R) -> Result<FixingTable, DataError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut table = FixingTable::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let line = i + 2;
        let (Some(date_field), Some(rate_field)) = (record.get(0), record.get(1)) else {
            return Err(DataError::Parse {
                line,
                message: "expected date,fixing".to_string(),
            });
        };
        let date = parse_date(date_field).map_err(|e| DataError::Parse {
            line,
            message: e.to_string(),
        })?;
        let rate: f64 = rate_field.parse().map_err(|_| DataError::Parse {
            line,
            message: format!("invalid fixing '{}'", rate_field),
        })?;
        table.insert(date, rate);
    }
    Ok(table)
}
