//! Functions for serializing records into CSV file downloads.

use axum::{
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::Error;

/// Serialize `rows` to CSV below the header row `headers`.
///
/// The header row is written even when there are no rows. `headers` should match the
/// serialized fields of `T`.
pub(crate) fn write_csv<T, I>(headers: &[&str], rows: I) -> Result<Vec<u8>, Error>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))
}

/// Build a response that the browser will save as `file_name`.
pub(crate) fn csv_attachment(file_name: &str, csv: Vec<u8>) -> Response {
    let content_disposition =
        match HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\"")) {
            Ok(value) => value,
            Err(error) => return Error::CsvError(error.to_string()).into_response(),
        };

    (
        StatusCode::OK,
        [
            (
                CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (CONTENT_DISPOSITION, content_disposition),
        ],
        csv,
    )
        .into_response()
}
