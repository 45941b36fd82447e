//! Seed data written the first time a collection key is read and found
//! absent.

use chrono::{DateTime, TimeZone, Utc};
use fc_core::models::{
    Component, ComponentStatus, JobPriority, JobStatus, MaintenanceJob, MaintenanceRecord,
    Notification, NotificationPriority, Ship, ShipStatus,
};

pub fn ships() -> Vec<Ship> {
    vec![
        Ship {
            id: "s1".into(),
            name: "Ever Given".into(),
            ship_type: "Container Ship".into(),
            build_year: "2018".into(),
            status: ShipStatus::Active,
            created_at: None,
        },
        Ship {
            id: "s2".into(),
            name: "Maersk Alabama".into(),
            ship_type: "Cargo Ship".into(),
            build_year: "2019".into(),
            status: ShipStatus::Maintenance,
            created_at: None,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn component(
    id: &str,
    ship_id: &str,
    name: &str,
    component_type: &str,
    status: ComponentStatus,
    last: &str,
    next: &str,
    note: &str,
) -> Component {
    Component {
        id: id.into(),
        ship_id: ship_id.into(),
        name: name.into(),
        component_type: component_type.into(),
        serial_number: None,
        status,
        installation_date: None,
        last_maintenance_date: Some(last.into()),
        next_maintenance_date: Some(next.into()),
        maintenance_interval: Some(6),
        maintenance_history: vec![MaintenanceRecord {
            date: last.into(),
            description: note.into(),
        }],
        created_at: None,
    }
}

pub fn components() -> Vec<Component> {
    vec![
        component(
            "c1",
            "s1",
            "Main Engine",
            "Engine",
            ComponentStatus::Operational,
            "2024-03-12",
            "2024-09-12",
            "Regular maintenance check",
        ),
        component(
            "c2",
            "s2",
            "Radar System",
            "Navigation",
            ComponentStatus::MaintenanceRequired,
            "2023-12-01",
            "2024-06-01",
            "Software update and calibration",
        ),
        component(
            "c3",
            "s1",
            "Propeller",
            "Propulsion",
            ComponentStatus::Operational,
            "2024-02-15",
            "2024-08-15",
            "Regular inspection and cleaning",
        ),
    ]
}

pub fn jobs() -> Vec<MaintenanceJob> {
    vec![
        MaintenanceJob {
            id: "j1".into(),
            title: "Main Engine Inspection".into(),
            description: Some("Regular inspection of main engine components".into()),
            ship_id: "s1".into(),
            component_id: Some("c1".into()),
            priority: JobPriority::High,
            status: JobStatus::Scheduled,
            assigned_to: Some("3".into()),
            scheduled_date: Some("2024-05-05".into()),
            start_date: Some("2024-05-05".into()),
            end_date: Some("2024-05-07".into()),
            completed_on_time: false,
            notes: Some("Check all engine parameters and perform necessary maintenance".into()),
            created_at: None,
        },
        MaintenanceJob {
            id: "j2".into(),
            title: "Radar System Maintenance".into(),
            description: Some("Scheduled maintenance of radar system".into()),
            ship_id: "s2".into(),
            component_id: Some("c2".into()),
            priority: JobPriority::Medium,
            status: JobStatus::InProgress,
            assigned_to: Some("3".into()),
            scheduled_date: Some("2024-03-15".into()),
            start_date: Some("2024-03-15".into()),
            end_date: Some("2024-03-16".into()),
            completed_on_time: true,
            notes: Some("Calibrate radar system and update software".into()),
            created_at: None,
        },
        MaintenanceJob {
            id: "j3".into(),
            title: "Hull Inspection".into(),
            description: Some("Regular hull inspection and cleaning".into()),
            ship_id: "s1".into(),
            component_id: None,
            priority: JobPriority::Low,
            status: JobStatus::Completed,
            assigned_to: Some("2".into()),
            scheduled_date: Some("2024-02-01".into()),
            start_date: Some("2024-02-01".into()),
            end_date: Some("2024-02-03".into()),
            completed_on_time: true,
            notes: Some("Hull cleaning and anti-fouling paint application completed".into()),
            created_at: None,
        },
    ]
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

pub fn notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "1".into(),
            kind: "warning".into(),
            title: "Maintenance Due".into(),
            message: "Engine maintenance is due in 7 days".into(),
            priority: NotificationPriority::Warning,
            created_at: at(2024, 3, 1, 10, 0),
            read: false,
        },
        Notification {
            id: "2".into(),
            kind: "success".into(),
            title: "Job Completed".into(),
            message: "Navigation system maintenance completed successfully".into(),
            priority: NotificationPriority::Success,
            created_at: at(2024, 3, 2, 14, 30),
            read: true,
        },
    ]
}
