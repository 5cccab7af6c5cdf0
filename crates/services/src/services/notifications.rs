//! Derivation of the ephemeral notification list shown on the client.
//!
//! Nothing here is persisted. The client polls its task and post snapshots,
//! hands them to [`derive_notifications`] together with the current instant
//! and its session-local dismissed set, and renders whatever comes back.
//! Identity of each notification is deterministic (`due-<task id>`,
//! `likes-<post id>`, ...) so dismissal survives re-derivation.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Utc};
use db::models::{
    post::PostWithCounts,
    task::{Task, TaskFrequency},
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

/// Output list is capped to the most recent entries.
pub const MAX_NOTIFICATIONS: usize = 50;

/// A task counts as due from its occurrence down to this many minutes before.
const DUE_WINDOW_MINUTES: i64 = 15;
/// Beyond the due window, a reminder is shown up to this many minutes ahead.
const REMINDER_WINDOW_MINUTES: i64 = 30;

const UNKNOWN_PET: &str = "Unknown Pet";

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    TaskReminder,
    ScheduledTask,
    Like,
    Comment,
    System,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct NotificationData {
    pub task_id: Option<Uuid>,
    pub pet_id: Option<Uuid>,
    pub post_id: Option<Uuid>,
}

/// An ephemeral notification record. Never stored; rebuilt on every poll.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Notification {
    /// Deterministic per underlying cause, e.g. `due-<task id>`.
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub icon: String,
    pub data: NotificationData,
}

/// Icon name for a task label, case-insensitive, with a generic fallback.
pub fn icon_for_task_type(task_type: &str) -> &'static str {
    match task_type.to_lowercase().as_str() {
        "feeding" => "restaurant",
        "drinking" => "water",
        "walking" => "walk",
        "grooming" => "cut",
        "playing" => "football",
        "custom" => "create",
        _ => "paw",
    }
}

/// The next instant a task is (or was, today) due, relative to `now`.
///
/// Daily tasks recur at the stored hour/minute every day; weekly tasks only
/// on the stored weekday (other weekdays yield `None`, matching the client's
/// behavior of staying silent until the matching weekday arrives); scheduled
/// tasks are a single instant, visible only on their own calendar date.
pub fn next_occurrence(
    frequency: TaskFrequency,
    time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match frequency {
        TaskFrequency::Daily => Some(now.date_naive().and_time(time.time()).and_utc()),
        TaskFrequency::Weekly => (now.weekday() == time.weekday())
            .then(|| now.date_naive().and_time(time.time()).and_utc()),
        TaskFrequency::Scheduled => (time.date_naive() == now.date_naive()).then_some(time),
    }
}

fn task_notification(
    now: DateTime<Utc>,
    task: &Task,
    pet_names: &HashMap<Uuid, String>,
) -> Option<Notification> {
    let occurrence = next_occurrence(task.frequency, task.time, now)?;
    let pet_name = pet_names
        .get(&task.pet_id)
        .map(String::as_str)
        .unwrap_or(UNKNOWN_PET);

    let (id, kind, title, message) = match task.frequency {
        TaskFrequency::Daily => {
            let until_due = occurrence.signed_duration_since(now);
            if until_due < chrono::Duration::zero() {
                return None;
            }
            let minutes = until_due.num_minutes();
            if minutes <= DUE_WINDOW_MINUTES {
                (
                    format!("due-{}", task.id),
                    NotificationKind::TaskReminder,
                    "Task Due Now".to_string(),
                    format!("{pet_name}'s {} is due now", task.task_type),
                )
            } else if minutes <= REMINDER_WINDOW_MINUTES {
                (
                    format!("reminder-{}", task.id),
                    NotificationKind::TaskReminder,
                    "Task Reminder".to_string(),
                    format!(
                        "{pet_name}'s {} is due in {minutes} minutes",
                        task.task_type
                    ),
                )
            } else {
                return None;
            }
        }
        TaskFrequency::Scheduled => {
            if occurrence >= now {
                (
                    format!("scheduled-{}", task.id),
                    NotificationKind::ScheduledTask,
                    "Scheduled Task Today".to_string(),
                    format!(
                        "{} for {pet_name} at {}",
                        task.task_type,
                        occurrence.format("%H:%M")
                    ),
                )
            } else {
                (
                    format!("overdue-{}", task.id),
                    NotificationKind::TaskReminder,
                    "Overdue Task".to_string(),
                    format!(
                        "{pet_name}'s {} was due at {}",
                        task.task_type,
                        occurrence.format("%H:%M")
                    ),
                )
            }
        }
        TaskFrequency::Weekly => {
            if occurrence >= now {
                (
                    format!("weekly-{}", task.id),
                    NotificationKind::ScheduledTask,
                    "Weekly Task Today".to_string(),
                    format!(
                        "{} for {pet_name} at {}",
                        task.task_type,
                        occurrence.format("%H:%M")
                    ),
                )
            } else {
                (
                    format!("overdue-weekly-{}", task.id),
                    NotificationKind::TaskReminder,
                    "Overdue Weekly Task".to_string(),
                    format!(
                        "{pet_name}'s {} was due at {}",
                        task.task_type,
                        occurrence.format("%H:%M")
                    ),
                )
            }
        }
    };

    Some(Notification {
        id,
        kind,
        title,
        message,
        timestamp: occurrence,
        icon: icon_for_task_type(&task.task_type).to_string(),
        data: NotificationData {
            task_id: Some(task.id),
            pet_id: Some(task.pet_id),
            post_id: None,
        },
    })
}

/// Caption preview for a like notification: at most 50 chars, or `None`
/// when the caption is blank.
fn caption_preview(caption: &str) -> Option<String> {
    let trimmed = caption.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() <= 50 {
        return Some(trimmed.to_string());
    }
    let cut: String = trimmed.chars().take(47).collect();
    Some(format!("{cut}..."))
}

fn like_notification(post: &PostWithCounts, current_user_id: Uuid) -> Option<Notification> {
    if post.owner_id != current_user_id || post.likes <= 0 {
        return None;
    }
    let title = if post.likes == 1 {
        "1 New Like".to_string()
    } else {
        format!("{} New Likes", post.likes)
    };
    let message = caption_preview(&post.caption)
        .map(|preview| format!("People liked \"{preview}\""))
        .unwrap_or_else(|| "People liked your post".to_string());

    Some(Notification {
        id: format!("likes-{}", post.id),
        kind: NotificationKind::Like,
        title,
        message,
        // Deliberately the post's creation time, not `now`: repeated polls
        // must not re-sort like notifications to the top.
        timestamp: post.created_at,
        icon: "heart".to_string(),
        data: NotificationData {
            task_id: None,
            pet_id: None,
            post_id: Some(post.id),
        },
    })
}

/// Derive the current notification list from a data snapshot.
///
/// Pure and deterministic given its inputs; `now` is passed in rather than
/// read from the clock so the windows are testable. Output is sorted most
/// recent first (stable on ties), minus anything in `dismissed`, deduplicated
/// by id (first occurrence wins) and capped at [`MAX_NOTIFICATIONS`].
pub fn derive_notifications(
    now: DateTime<Utc>,
    tasks: &[Task],
    pet_names: &HashMap<Uuid, String>,
    posts: &[PostWithCounts],
    current_user_id: Uuid,
    dismissed: &HashSet<String>,
) -> Vec<Notification> {
    let mut notifications: Vec<Notification> = tasks
        .iter()
        .filter_map(|task| task_notification(now, task, pet_names))
        .chain(
            posts
                .iter()
                .filter_map(|post| like_notification(post, current_user_id)),
        )
        .collect();

    // Vec::sort_by is stable, so input order breaks timestamp ties.
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut seen = HashSet::new();
    notifications.retain(|n| !dismissed.contains(&n.id) && seen.insert(n.id.clone()));
    notifications.truncate(MAX_NOTIFICATIONS);
    notifications
}
