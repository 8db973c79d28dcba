use crate::constants::csv_column;
use crate::error::{AppError, Result};
use crate::models::{PriceRecord, PriceSeries};
use chrono_tz::Tz;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

/// Parse a price CSV stream into records for `symbol`
///
/// Expects one header line followed by `<epoch_millis>,<ignored>,<price>` rows.
/// Any malformed row aborts the whole stream: nothing is returned for a
/// partially valid file.
pub fn parse_price_csv<R: Read>(reader: R, symbol: &str, tz: &Tz) -> Result<PriceSeries> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut prices = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| processing_fault(symbol, e.to_string()))?;
        prices.push(parse_price_record(&record, symbol, tz)?);
    }

    Ok(prices)
}

fn parse_price_record(record: &StringRecord, symbol: &str, tz: &Tz) -> Result<PriceRecord> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    let raw_timestamp = field(record, csv_column::TIMESTAMP, symbol, line)?;
    let millis: i64 = raw_timestamp.parse().map_err(|_| {
        processing_fault(symbol, format!("line {}: invalid timestamp '{}'", line, raw_timestamp))
    })?;

    let raw_price = field(record, csv_column::PRICE, symbol, line)?;
    let price: f64 = raw_price.parse().map_err(|_| {
        processing_fault(symbol, format!("line {}: invalid price '{}'", line, raw_price))
    })?;
    if !price.is_finite() {
        return Err(processing_fault(
            symbol,
            format!("line {}: price '{}' is not a finite number", line, raw_price),
        ));
    }

    PriceRecord::from_epoch_millis(millis, symbol, price, tz).ok_or_else(|| {
        processing_fault(symbol, format!("line {}: timestamp {} out of range", line, millis))
    })
}

fn field<'r>(record: &'r StringRecord, index: usize, symbol: &str, line: u64) -> Result<&'r str> {
    record.get(index).ok_or_else(|| {
        processing_fault(
            symbol,
            format!("line {}: expected at least {} fields, found {}", line, index + 1, record.len()),
        )
    })
}

fn processing_fault(symbol: &str, message: String) -> AppError {
    AppError::DataProcessing {
        symbol: symbol.to_uppercase(),
        message,
    }
}
