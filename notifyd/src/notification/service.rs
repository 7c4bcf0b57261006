//! Notification service.
//!
//! Glue between the HTTP layer and the core: validates a request, dispatches
//! it, and records the result when history storage is available.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::dispatcher::Dispatcher;
use crate::Result;
use crate::database::models::NotificationRecordDbModel;
use crate::database::repositories::NotificationHistoryRepository;
use crate::domain::{ChannelType, NotificationRequest, NotificationStatus};

/// What the caller learns about one dispatched notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReceipt {
    pub notification_id: String,
    pub status: NotificationStatus,
    pub channel: ChannelType,
    pub sent_at: DateTime<Utc>,
    pub error: Option<String>,
}

/// Dispatches notifications and keeps their history.
#[derive(Clone)]
pub struct NotificationService {
    dispatcher: Dispatcher,
    history: Option<Arc<dyn NotificationHistoryRepository>>,
}

impl NotificationService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            history: None,
        }
    }

    pub fn with_history(mut self, history: Arc<dyn NotificationHistoryRepository>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> Option<&Arc<dyn NotificationHistoryRepository>> {
        self.history.as_ref()
    }

    /// Validate, dispatch and record `request`.
    ///
    /// Only validation errors are returned. Delivery failures are part of the
    /// receipt, and a failing history store is logged and ignored.
    pub async fn notify(&self, request: &NotificationRequest) -> Result<NotificationReceipt> {
        request.validate()?;

        let notification_id = Uuid::new_v4().to_string();
        let outcome = self.dispatcher.dispatch_request(request).await;
        let sent_at = Utc::now();

        info!(
            notification_id = %notification_id,
            channel = %request.channel,
            priority = %request.priority,
            status = %outcome.status,
            "Notification dispatched"
        );

        if let Some(history) = &self.history {
            let stored = match NotificationRecordDbModel::new(&notification_id, request, &outcome, sent_at) {
                Ok(record) => history.store(&record).await,
                Err(e) => Err(e),
            };
            if let Err(e) = stored {
                warn!(notification_id = %notification_id, error = %e, "Failed to store notification history");
            }
        }

        Ok(NotificationReceipt {
            notification_id,
            status: outcome.status,
            channel: request.channel,
            sent_at,
            error: outcome.error,
        })
    }
}
