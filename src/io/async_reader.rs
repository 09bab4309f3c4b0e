//! Asynchronous CSV reader with batch interface
//!
//! Reads command records from any `futures` `AsyncRead` in fixed-size batches
//! for the async processing strategy.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of PointCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{PointCommand, PointError, Result};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Keeps streaming behavior: at most one batch of commands is held in memory.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader over `reader`
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read up to `batch_size` commands
    ///
    /// Malformed rows are logged and skipped, so a batch may be shorter than
    /// `batch_size` even before the end of input. An empty batch means the
    /// input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `PointError::Io` if the underlying source fails mid-read.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<PointCommand>> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(next) = records.next().await else {
                break;
            };
            self.line_num += 1;

            let converted = match next {
                Ok(csv_record) => convert_csv_record(csv_record, Some(self.line_num)),
                Err(e) if e.is_io_error() => {
                    return Err(PointError::Io {
                        message: format!("Failed to read line {}: {}", self.line_num, e),
                    })
                }
                Err(e) => Err(PointError::parse(Some(self.line_num), e.to_string())),
            };

            match converted {
                Ok(command) => batch.push(command),
                Err(e) => warn!(error = %e, "skipping malformed record"),
            }
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandKind;
    use futures::io::Cursor;

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let csv_content = "type,user,amount\nregister,1,\ncharge,1,100\nregister,2,\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].kind, CommandKind::Register);
        assert_eq!(batch[1].amount, Some(100));

        let batch = async_reader.read_batch(2).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].user, 2);

        assert!(async_reader.read_batch(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = AsyncReader::new(Cursor::new("type,user,amount\n".as_bytes()));

        assert!(async_reader.read_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_records() {
        let csv_content = "type,user,amount\nrefund,1,100\ncharge,x,1\ncharge,1,50\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].amount, Some(50));
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let csv_content = "type,user,amount\n  CHARGE  ,  1  ,  100  \nUse,1,5\n";
        let mut async_reader = AsyncReader::new(Cursor::new(csv_content.as_bytes()));

        let batch = async_reader.read_batch(10).await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].kind, CommandKind::Charge);
        assert_eq!(batch[0].user, 1);
        assert_eq!(batch[1].kind, CommandKind::Use);
    }

    /// Source that yields its prefix and then fails
    struct FailingSource {
        prefix: Cursor<&'static [u8]>,
    }

    impl AsyncRead for FailingSource {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            cx: &mut std::task::Context<'_>,
            buf: &mut [u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            match std::pin::Pin::new(&mut self.prefix).poll_read(cx, buf) {
                std::task::Poll::Ready(Ok(0)) => std::task::Poll::Ready(Err(
                    std::io::Error::new(std::io::ErrorKind::Other, "device disconnected"),
                )),
                other => other,
            }
        }
    }

    #[tokio::test]
    async fn test_async_reader_returns_read_failure() {
        let source = FailingSource {
            prefix: Cursor::new(&b"type,user,amount\nregister,1,\ncharge,1,5\n"[..]),
        };
        let mut async_reader = AsyncReader::new(source);

        let err = async_reader.read_batch(10).await.unwrap_err();

        assert!(matches!(err, PointError::Io { .. }));
        assert!(err.is_fatal());
    }
}
