//! Notification history repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::NotificationRecordDbModel;
use crate::domain::{ChannelType, NotificationStatus, PriorityLevel};

/// Optional filters for listing history. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub channel: Option<ChannelType>,
    pub status: Option<NotificationStatus>,
    pub priority: Option<PriorityLevel>,
    /// Matches `metadata.service`.
    pub service: Option<String>,
}

impl HistoryFilter {
    fn where_clause(&self) -> String {
        let mut conditions: Vec<&str> = Vec::new();
        if self.channel.is_some() {
            conditions.push("channel = ?");
        }
        if self.status.is_some() {
            conditions.push("status = ?");
        }
        if self.priority.is_some() {
            conditions.push("priority = ?");
        }
        if self.service.is_some() {
            conditions.push("json_extract(metadata, '$.service') = ?");
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        }
    }

    /// Bind values in the same order as [`Self::where_clause`].
    fn bind_values(&self) -> Vec<String> {
        let mut values = Vec::new();
        if let Some(channel) = self.channel {
            values.push(channel.as_str().to_string());
        }
        if let Some(status) = self.status {
            values.push(status.as_str().to_string());
        }
        if let Some(priority) = self.priority {
            values.push(priority.as_str().to_string());
        }
        if let Some(service) = &self.service {
            values.push(service.clone());
        }
        values
    }
}

/// Append-only store of dispatched notifications.
#[async_trait]
pub trait NotificationHistoryRepository: Send + Sync {
    async fn store(&self, record: &NotificationRecordDbModel) -> Result<()>;

    /// Matching records, newest first, plus the total number of matches.
    async fn list(
        &self,
        filter: &HistoryFilter,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<NotificationRecordDbModel>, u64)>;
}

/// SQLx implementation of NotificationHistoryRepository.
pub struct SqlxNotificationHistoryRepository {
    pool: SqlitePool,
}

impl SqlxNotificationHistoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationHistoryRepository for SqlxNotificationHistoryRepository {
    async fn store(&self, record: &NotificationRecordDbModel) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, channel, message, priority, status, recipient,
                metadata, error, sent_at, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.channel)
        .bind(&record.message)
        .bind(&record.priority)
        .bind(&record.status)
        .bind(&record.recipient)
        .bind(&record.metadata)
        .bind(&record.error)
        .bind(record.sent_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &HistoryFilter,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<NotificationRecordDbModel>, u64)> {
        let where_clause = filter.where_clause();
        let values = filter.bind_values();

        let count_sql = format!("SELECT COUNT(*) FROM notifications {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in &values {
            count_query = count_query.bind(value);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT * FROM notifications {} ORDER BY sent_at DESC, created_at DESC LIMIT ? OFFSET ?",
            where_clause
        );
        let mut data_query = sqlx::query_as::<_, NotificationRecordDbModel>(&data_sql);
        for value in &values {
            data_query = data_query.bind(value);
        }
        let records = data_query
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;

        Ok((records, total.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let filter = HistoryFilter::default();
        assert_eq!(filter.where_clause(), "");
        assert!(filter.bind_values().is_empty());
    }

    #[test]
    fn test_filter_clause_and_values_line_up() {
        let filter = HistoryFilter {
            channel: Some(ChannelType::Discord),
            status: None,
            priority: Some(PriorityLevel::High),
            service: Some("billing".to_string()),
        };
        assert_eq!(
            filter.where_clause(),
            "WHERE channel = ? AND priority = ? AND json_extract(metadata, '$.service') = ?"
        );
        assert_eq!(filter.bind_values(), vec!["discord", "high", "billing"]);
    }
}
