//! Streaming CSV row decoder
//!
//! Turns a byte stream of delimited text (header row first) into an ordered,
//! lazy sequence of [`DecodedRow`]s. The sequence is finite and
//! non-restartable; rows decode in file order and standard CSV quoting
//! applies (quoted fields, escaped quotes, embedded delimiters and line
//! breaks). A malformed row fails with [`CatalogError::Parse`] at that row;
//! rows already yielded stay valid.

use catalog_common::{CatalogError, Result};
use csv_async::{AsyncReader, AsyncReaderBuilder, StringRecord};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio::io::AsyncRead;

/// One data record, keyed by header column name, in file column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRow {
    fields: Vec<(String, String)>,
}

impl DecodedRow {
    /// Build a row from a header record and a data record.
    ///
    /// Column counts are equal here; the decoder rejects mismatched rows
    /// before this point.
    fn new(headers: &StringRecord, record: &StringRecord) -> Self {
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { fields }
    }

    /// Look up a field value by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Fields in file column order.
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// Serialized as a JSON object whose keys keep the file's column order, which
// is the message body shape the downstream consumer sees.
impl Serialize for DecodedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Streaming decoder over any async byte source.
pub struct RowDecoder<R> {
    reader: AsyncReader<R>,
    headers: StringRecord,
    record: StringRecord,
    rows_read: u64,
}

impl<R: AsyncRead + Unpin + Send> RowDecoder<R> {
    /// Create a decoder, consuming the header row up front.
    pub async fn new(source: R) -> Result<Self> {
        let mut reader = AsyncReaderBuilder::new().create_reader(source);

        let headers = reader
            .headers()
            .await
            .map_err(|e| CatalogError::Parse(format!("header row: {}", e)))?
            .clone();

        Ok(Self {
            reader,
            headers,
            record: StringRecord::new(),
            rows_read: 0,
        })
    }

    /// Column names from the header row.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Number of data rows decoded so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Decode the next data row, or `None` at clean end-of-stream.
    ///
    /// Trailing blank lines yield no row. A malformed row (bad quoting,
    /// unequal column count) is a terminal `Parse` error.
    pub async fn next_row(&mut self) -> Result<Option<DecodedRow>> {
        let more = self
            .reader
            .read_record(&mut self.record)
            .await
            .map_err(|e| CatalogError::Parse(format!("row {}: {}", self.rows_read + 1, e)))?;

        if !more {
            return Ok(None);
        }

        self.rows_read += 1;
        Ok(Some(DecodedRow::new(&self.headers, &self.record)))
    }
}
