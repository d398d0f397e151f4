//! Mass redaction use case.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::application::dto::RedactReport;
use crate::application::services::TxnIdGenerator;
use crate::domain::entities::RoomId;
use crate::domain::errors::RedactError;
use crate::domain::ports::MatrixPort;

/// Redacts every message in a room's history.
pub struct MassRedactUseCase {
    matrix: Arc<dyn MatrixPort>,
    txn_ids: Mutex<TxnIdGenerator>,
}

impl MassRedactUseCase {
    /// Creates new mass redaction use case.
    #[must_use]
    pub fn new(matrix: Arc<dyn MatrixPort>) -> Self {
        Self::with_txn_ids(matrix, TxnIdGenerator::new())
    }

    /// Creates the use case with a specific transaction id source.
    #[must_use]
    pub fn with_txn_ids(matrix: Arc<dyn MatrixPort>, txn_ids: TxnIdGenerator) -> Self {
        Self {
            matrix,
            txn_ids: Mutex::new(txn_ids),
        }
    }

    /// Walks the room history page by page and redacts each live message.
    ///
    /// Events with empty content are treated as already redacted. A rerun
    /// starts again from the latest page.
    ///
    /// # Errors
    /// Returns error on the first failed fetch or redaction.
    pub async fn execute(&self, room_id: &RoomId) -> Result<RedactReport, RedactError> {
        let mut report = RedactReport::default();
        let mut since = String::new();

        loop {
            debug!(room_id = %room_id, since = %since, "Fetching messages");

            let page = self
                .matrix
                .get_room_events(room_id.as_str(), &since)
                .await
                .map_err(|e| {
                    warn!(error = %e, "Error fetching messages");
                    RedactError::FetchEvents(e)
                })?;
            report.pages += 1;

            for event in &page.chunk {
                if !event.should_redact() {
                    report.skipped += 1;
                    continue;
                }

                let txn_id = self.next_txn_id();
                debug!(event_id = %event.event_id, txn_id = %txn_id, "Redacting event");

                self.matrix
                    .redact_event(room_id.as_str(), &event.event_id, &txn_id)
                    .await
                    .map_err(|source| {
                        warn!(event_id = %event.event_id, error = %source, "Error redacting messages");
                        RedactError::Redact {
                            event_id: event.event_id.clone(),
                            source,
                        }
                    })?;
                report.redacted += 1;
            }

            match page.next_cursor() {
                Some(cursor) => since = cursor.to_string(),
                None => break,
            }
        }

        info!(
            room_id = %room_id,
            pages = report.pages,
            redacted = report.redacted,
            skipped = report.skipped,
            "Finished redacting"
        );

        Ok(report)
    }

    fn next_txn_id(&self) -> String {
        self.txn_ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_id()
    }
}
