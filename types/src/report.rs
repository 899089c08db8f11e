//! The structured outcome of one training task.

use serde::{Deserialize, Serialize};

use crate::money::Cents;

/// Final report of one task run. Built once by the report builder and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub subtask_id: String,
    /// UNIX epoch seconds.
    pub start_time: f64,
    /// UNIX epoch seconds.
    pub end_time: f64,
    pub duration_sec: f64,
    pub errors: u32,
    pub independence_score: u8,
    pub quality_score: u8,
    pub process_score: u8,
    pub success: bool,
    /// Ended by quit/escape instead of a task action.
    #[serde(default)]
    pub abandoned: bool,
    #[serde(flatten)]
    pub details: TaskDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskDetails {
    VerifyChange {
        target_change: Cents,
        shown_change: Cents,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        user_guess: Option<Cents>,
    },
    Wallet {
        target_total: Cents,
        payment_given: Cents,
        drag_events: u32,
        extraneous_moves: u32,
        attempts_used: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::{TaskDetails, TaskResult};
    use crate::money::Cents;

    fn wallet_result() -> TaskResult {
        TaskResult {
            subtask_id: "make_change_submit".to_string(),
            start_time: 1_700_000_000.0,
            end_time: 1_700_000_012.5,
            duration_sec: 12.5,
            errors: 0,
            independence_score: 2,
            quality_score: 3,
            process_score: 3,
            success: true,
            abandoned: false,
            details: TaskDetails::Wallet {
                target_total: Cents::new(232),
                payment_given: Cents::new(232),
                drag_events: 6,
                extraneous_moves: 1,
                attempts_used: 1,
            },
        }
    }

    #[test]
    fn wallet_fields_are_flattened_into_the_report() {
        let value = serde_json::to_value(wallet_result()).unwrap();
        assert_eq!(value["subtask_id"], "make_change_submit");
        assert_eq!(value["target_total"], 2.32);
        assert_eq!(value["payment_given"], 2.32);
        assert_eq!(value["drag_events"], 6);
        assert_eq!(value["quality_score"], 3);
        assert!(value.get("details").is_none());
    }

    #[test]
    fn verify_guess_is_omitted_when_absent() {
        let mut result = wallet_result();
        result.details = TaskDetails::VerifyChange {
            target_change: Cents::new(375),
            shown_change: Cents::new(355),
            user_guess: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["shown_change"], 3.55);
        assert!(value.get("user_guess").is_none());
    }
}
