//! # Domain Models
//!
//! These structs represent the core entities of the Fleet Console.
//! Field names follow the persisted camelCase layout. Record ids are
//! `<prefix>-<uuid v7>` strings: time-ordered and collision resistant.
//! Fixture records keep their short historical ids (`s1`, `c1`, ...).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

pub const SHIP_ID_PREFIX: &str = "s";
pub const COMPONENT_ID_PREFIX: &str = "c";
pub const JOB_ID_PREFIX: &str = "j";
pub const NOTIFICATION_ID_PREFIX: &str = "n";

/// Generates a new record id such as `s-01920c4b6f3a7cc1a3d5e0f1b2c3d4e5`.
pub fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7().simple())
}

/// A persisted entity stored as one element of a JSON array.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable entity name used in errors and logs.
    const ENTITY: &'static str;

    /// Input-only field aliases (`alias` -> canonical camelCase name).
    /// Patches are normalized through this table before they are merged.
    const ALIASES: &'static [(&'static str, &'static str)] = &[];

    fn id(&self) -> &str;
}

/// Defines a closed set of snake_case string values with `as_str`, `Display`
/// and `FromStr`.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(AppError::ValidationError(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

string_enum!(
    /// Operational state of a vessel.
    ShipStatus {
        Active => "active",
        Maintenance => "maintenance",
        Inactive => "inactive",
    }
);

string_enum!(
    /// Condition of a component. `Maintained` is the resolved state and is
    /// never counted as overdue.
    ComponentStatus {
        Operational => "operational",
        MaintenanceRequired => "maintenance_required",
        NonOperational => "non_operational",
        Maintained => "maintained",
    }
);

string_enum!(
    JobPriority {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
);

string_enum!(
    /// Lifecycle of a maintenance job.
    JobStatus {
        Scheduled => "scheduled",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

string_enum!(
    NotificationPriority {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
    }
);

string_enum!(
    /// Console roles; drives route access.
    Role {
        Admin => "admin",
        Inspector => "inspector",
        Engineer => "engineer",
    }
);

impl Default for ShipStatus {
    fn default() -> Self {
        ShipStatus::Active
    }
}

impl Default for ComponentStatus {
    fn default() -> Self {
        ComponentStatus::Operational
    }
}

impl ComponentStatus {
    /// Terminal "resolved" state excluded from overdue counts.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ComponentStatus::Maintained)
    }
}

impl Default for JobPriority {
    fn default() -> Self {
        JobPriority::Medium
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Scheduled
    }
}

impl Default for NotificationPriority {
    fn default() -> Self {
        NotificationPriority::Info
    }
}

// ── Ships ──────────────────────────────────────────────────────────────────

/// A vessel owning zero or more components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ship {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub ship_type: String,
    #[serde(default)]
    pub build_year: String,
    #[serde(default)]
    pub status: ShipStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Ship {
    const ENTITY: &'static str = "Ship";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a ship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewShip {
    #[validate(length(min = 1, message = "ship name is required"))]
    pub name: String,
    #[serde(rename = "type", default)]
    pub ship_type: String,
    #[serde(default)]
    pub build_year: String,
    #[serde(default)]
    pub status: ShipStatus,
}

impl NewShip {
    pub fn into_ship(self, id: String, created_at: DateTime<Utc>) -> Ship {
        Ship {
            id,
            name: self.name,
            ship_type: self.ship_type,
            build_year: self.build_year,
            status: self.status,
            created_at: Some(created_at),
        }
    }
}

// ── Components ─────────────────────────────────────────────────────────────

/// One entry of a component's maintenance log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub date: String,
    pub description: String,
}

/// A maintainable subsystem belonging to exactly one ship.
///
/// `next_maintenance_date` is informational: it is never recomputed from
/// `last_maintenance_date` and `maintenance_interval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub ship_id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(default, alias = "installDate", skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_maintenance_date: Option<String>,
    /// Months between services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_interval: Option<u32>,
    #[serde(default)]
    pub maintenance_history: Vec<MaintenanceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Component {
    const ENTITY: &'static str = "Component";
    const ALIASES: &'static [(&'static str, &'static str)] =
        &[("installDate", "installationDate")];

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for creating a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewComponent {
    #[validate(length(min = 1, message = "shipId is required"))]
    pub ship_id: String,
    #[validate(length(min = 1, message = "component name is required"))]
    pub name: String,
    #[serde(rename = "type", default)]
    pub component_type: String,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(default)]
    pub installation_date: Option<String>,
    #[serde(default)]
    pub last_maintenance_date: Option<String>,
    #[serde(default)]
    pub next_maintenance_date: Option<String>,
    #[serde(default)]
    pub maintenance_interval: Option<u32>,
}

impl NewComponent {
    /// New components always start with an empty maintenance history.
    pub fn into_component(self, id: String, created_at: DateTime<Utc>) -> Component {
        Component {
            id,
            ship_id: self.ship_id,
            name: self.name,
            component_type: self.component_type,
            serial_number: self.serial_number,
            status: self.status,
            installation_date: self.installation_date,
            last_maintenance_date: self.last_maintenance_date,
            next_maintenance_date: self.next_maintenance_date,
            maintenance_interval: self.maintenance_interval,
            maintenance_history: Vec::new(),
            created_at: Some(created_at),
        }
    }
}

// ── Maintenance jobs ───────────────────────────────────────────────────────

/// A scheduled or completed work item against one component on one ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceJob {
    pub id: String,
    #[serde(alias = "jobType")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ship_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default)]
    pub priority: JobPriority,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, alias = "assignedEngineer", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, alias = "dueDate", skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub completed_on_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for MaintenanceJob {
    const ENTITY: &'static str = "MaintenanceJob";
    const ALIASES: &'static [(&'static str, &'static str)] = &[
        ("jobType", "title"),
        ("assignedEngineer", "assignedTo"),
        ("dueDate", "scheduledDate"),
    ];

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for scheduling a job. Status is not part of the draft: new jobs are
/// always `scheduled` and not yet completed on time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[serde(alias = "jobType")]
    #[validate(length(min = 1, message = "job title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "shipId is required"))]
    pub ship_id: String,
    #[serde(default)]
    #[validate(required(message = "componentId is required"))]
    pub component_id: Option<String>,
    #[serde(default)]
    pub priority: JobPriority,
    #[serde(default, alias = "assignedEngineer")]
    pub assigned_to: Option<String>,
    #[serde(default, alias = "dueDate")]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewJob {
    pub fn into_job(self, id: String, created_at: DateTime<Utc>) -> MaintenanceJob {
        MaintenanceJob {
            id,
            title: self.title,
            description: self.description,
            ship_id: self.ship_id,
            component_id: self.component_id,
            priority: self.priority,
            status: JobStatus::Scheduled,
            assigned_to: self.assigned_to,
            scheduled_date: self.scheduled_date,
            start_date: self.start_date,
            end_date: self.end_date,
            completed_on_time: false,
            notes: self.notes,
            created_at: Some(created_at),
        }
    }
}

// ── Notifications ──────────────────────────────────────────────────────────

/// An entry of the notification center log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    /// Free-form kind, e.g. `component_created` or `warning`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Record for Notification {
    const ENTITY: &'static str = "Notification";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
}

impl NewNotification {
    pub fn new(kind: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            priority: NotificationPriority::Info,
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }
}

// ── Users ──────────────────────────────────────────────────────────────────

/// Authentication fixture. `password` is either a plaintext fixture value or
/// an argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
}

/// The user-info blob stored alongside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
        }
    }
}
