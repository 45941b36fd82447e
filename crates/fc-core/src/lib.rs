//! Domain types and ports for the Fleet Console:
//! entity models, storage and auth ports, the derived-statistics engine
//! behind the KPI dashboard, and the filters behind the maintenance list and
//! calendar.

pub mod access;
pub mod error;
pub mod filter;
pub mod models;
pub mod stats;
pub mod traits;

pub use error::*;
pub use models::*;
pub use traits::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let a = generate_id(JOB_ID_PREFIX);
        let b = generate_id(JOB_ID_PREFIX);
        assert!(a.starts_with("j-"));
        assert_ne!(a, b);
    }

    #[test]
    fn job_accepts_form_aliases() {
        let job: MaintenanceJob = serde_json::from_value(serde_json::json!({
            "id": "1",
            "jobType": "Hull Inspection",
            "shipId": "s1",
            "componentId": "c1",
            "assignedEngineer": "3",
            "dueDate": "2024-05-05",
            "priority": "low",
            "status": "in_progress"
        }))
        .unwrap();
        assert_eq!(job.title, "Hull Inspection");
        assert_eq!(job.assigned_to.as_deref(), Some("3"));
        assert_eq!(job.scheduled_date.as_deref(), Some("2024-05-05"));
        assert_eq!(job.status, JobStatus::InProgress);
        assert!(!job.completed_on_time);
    }

    #[test]
    fn status_strings_round_trip_through_from_str() {
        for status in ComponentStatus::ALL {
            assert_eq!(status.as_str().parse::<ComponentStatus>().unwrap(), *status);
        }
        assert!("sunk".parse::<ShipStatus>().is_err());
    }

    #[test]
    fn new_job_requires_title_ship_and_component() {
        use validator::Validate;

        let draft = NewJob {
            title: "Engine check".into(),
            ship_id: "s1".into(),
            component_id: Some("c1".into()),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());

        let missing = NewJob {
            component_id: None,
            ..draft.clone()
        };
        assert!(missing.validate().is_err());

        let untitled = NewJob {
            title: String::new(),
            ..draft
        };
        assert!(untitled.validate().is_err());
    }
}
