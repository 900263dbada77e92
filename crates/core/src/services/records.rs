use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::BookingConfig,
    errors::TimelineResult,
    models::{
        notification::{Message, TemplateType},
        record::{Feedback, NewRecord, Record, RecordList, RecordListParams, RecordPatch, Reminder},
    },
    repositories::{Notifier, RecordStore},
    services::with_deadline,
};

/// Builds the reminder notification for one booked record.
pub fn reminder_message(reminder: &Reminder) -> Message {
    Message {
        recipient: reminder.user_email.clone(),
        template: TemplateType::Reminder,
        payload: json!({
            "record_id": reminder.record.record_id,
            "org_id": reminder.record.org_id,
            "worker_id": reminder.record.worker_id,
            "service_id": reminder.record.service_id,
            "slot_start": reminder.slot_start,
            "slot_end": reminder.slot_end,
        }),
        attach: true,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderReport {
    pub found: usize,
    pub sent: usize,
}

/// Creates, patches and cancels bookings.
///
/// Slot claiming happens inside the store's transaction; this type adds
/// deadlines, validation and the reminder side effect.
pub struct RecordManager {
    records: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    reminder_window: TimeDelta,
    timeout: Duration,
}

impl RecordManager {
    pub fn new(
        records: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            records,
            notifier,
            reminder_window: config.reminder_window(),
            timeout: config.store_timeout(),
        }
    }

    pub async fn record(&self, record_id: Uuid) -> TimelineResult<Record> {
        with_deadline(self.timeout, "record", self.records.record(record_id)).await
    }

    pub async fn record_list(&self, params: &RecordListParams) -> TimelineResult<RecordList> {
        params.validate()?;
        with_deadline(self.timeout, "record_list", self.records.record_list(params)).await
    }

    /// Books a slot.
    ///
    /// Fails with `SlotUnavailable` when the slot is already taken. The
    /// reminder is sent in the background after the booking is committed and
    /// its failure never undoes the booking.
    pub async fn record_add(&self, record: NewRecord) -> TimelineResult<Record> {
        let reminder =
            with_deadline(self.timeout, "record_add", self.records.record_add(&record)).await?;

        info!(
            record_id = %reminder.record.record_id,
            slot_id = %reminder.record.slot_id,
            user_id = %reminder.record.user_id,
            "record created"
        );

        let booked = reminder.record.clone();
        self.dispatch(reminder);
        Ok(booked)
    }

    pub async fn record_patch(&self, patch: RecordPatch) -> TimelineResult<Record> {
        with_deadline(self.timeout, "record_patch", self.records.record_patch(&patch)).await
    }

    /// Cancels a booking and frees its slot.
    pub async fn record_delete(&self, record_id: Uuid) -> TimelineResult<()> {
        with_deadline(self.timeout, "record_delete", self.records.record_delete(record_id)).await?;
        info!(record_id = %record_id, "record deleted");
        Ok(())
    }

    pub async fn upcoming_records(&self, now: DateTime<Utc>) -> TimelineResult<Vec<Reminder>> {
        let window = now..now + self.reminder_window;
        with_deadline(self.timeout, "upcoming_records", self.records.upcoming_records(window)).await
    }

    /// Sends one reminder per upcoming record and marks the delivered ones.
    pub async fn send_reminders(&self, now: DateTime<Utc>) -> TimelineResult<ReminderReport> {
        let upcoming = self.upcoming_records(now).await?;
        let mut delivered = Vec::with_capacity(upcoming.len());

        for reminder in &upcoming {
            match self.notifier.send_message(reminder_message(reminder)).await {
                Ok(()) => delivered.push(reminder.record.record_id),
                Err(err) => warn!(
                    record_id = %reminder.record.record_id,
                    error = %err,
                    "failed to send reminder"
                ),
            }
        }

        if !delivered.is_empty() {
            with_deadline(
                self.timeout,
                "mark_reminded",
                self.records.mark_reminded(&delivered, now),
            )
            .await?;
        }

        let report = ReminderReport {
            found: upcoming.len(),
            sent: delivered.len(),
        };
        info!(found = report.found, sent = report.sent, "reminder sweep finished");
        Ok(report)
    }

    pub async fn feedback_add(
        &self,
        feedback: Feedback,
        now: DateTime<Utc>,
    ) -> TimelineResult<Feedback> {
        feedback.validate()?;
        with_deadline(self.timeout, "feedback_add", self.records.feedback_add(&feedback, now)).await
    }

    pub async fn feedback(&self, record_id: Uuid) -> TimelineResult<Feedback> {
        with_deadline(self.timeout, "feedback", self.records.feedback(record_id)).await
    }

    fn dispatch(&self, reminder: Reminder) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            let record_id = reminder.record.record_id;
            match notifier.send_message(reminder_message(&reminder)).await {
                Ok(()) => debug!(record_id = %record_id, "booking reminder sent"),
                Err(err) => warn!(
                    record_id = %record_id,
                    error = %err,
                    "failed to send booking reminder"
                ),
            }
        });
    }
}
