//! Homework API response checks and status message formatting
//!
//! The API payload is kept as a `serde_json::Value` so that each malformed
//! shape maps to its own error kind instead of a generic decode failure.

use serde_json::Value;

use super::types::Verdict;
use crate::error::{BotError, Result};

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";
pub const STATUS_KEY: &str = "status";
pub const HOMEWORK_NAME_KEY: &str = "homework_name";

/// Text used when no homework changed since the cursor.
pub const NOTHING_NEW: &str = "На ревью нет новых домашек.";

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Check the shape of an API response and hand it back unchanged.
pub fn validate(response: Value) -> Result<Value> {
    let map = response.as_object().ok_or(BotError::ResponseType {
        found: type_name(&response),
    })?;

    let homeworks = map
        .get(HOMEWORKS_KEY)
        .ok_or(BotError::MissingKey(HOMEWORKS_KEY))?;
    if !map.contains_key(CURRENT_DATE_KEY) {
        return Err(BotError::MissingKey(CURRENT_DATE_KEY));
    }
    if !homeworks.is_array() {
        return Err(BotError::HomeworksFieldType {
            found: type_name(homeworks),
        });
    }

    Ok(response)
}

/// Most recent homework of a validated response, if any.
///
/// Only the first record is considered; the API lists the latest change first.
pub fn latest_homework(response: &Value) -> Option<&Value> {
    response
        .get(HOMEWORKS_KEY)
        .and_then(Value::as_array)
        .and_then(|homeworks| homeworks.first())
}

/// Server time of a validated response, used as the next poll cursor.
pub fn current_date(response: &Value) -> Result<i64> {
    let value = response
        .get(CURRENT_DATE_KEY)
        .ok_or(BotError::MissingKey(CURRENT_DATE_KEY))?;
    value.as_i64().ok_or(BotError::CurrentDateFieldType {
        found: type_name(value),
    })
}

/// Human-readable status line for `homework`, or [`NOTHING_NEW`] for `None`.
pub fn describe(homework: Option<&Value>) -> Result<String> {
    let Some(homework) = homework else {
        return Ok(NOTHING_NEW.to_string());
    };
    let record = homework.as_object().ok_or(BotError::HomeworkType {
        found: type_name(homework),
    })?;

    let status = record
        .get(STATUS_KEY)
        .ok_or(BotError::MissingKey(STATUS_KEY))?;
    let verdict = status
        .as_str()
        .and_then(Verdict::from_code)
        .ok_or_else(|| BotError::UnexpectedStatus(plain_text(status)))?;

    let name = record
        .get(HOMEWORK_NAME_KEY)
        .ok_or(BotError::MissingKey(HOMEWORK_NAME_KEY))?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        plain_text(name),
        verdict.text()
    ))
}

/// Strings without JSON quotes, anything else in its JSON form.
fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_accepts_well_formed_response() {
        let response = json!({
            "homeworks": [{"status": "approved", "homework_name": "hw1"}],
            "current_date": 1000
        });
        assert_eq!(validate(response.clone()).unwrap(), response);

        let empty = json!({"homeworks": [], "current_date": 1000});
        assert_eq!(validate(empty.clone()).unwrap(), empty);
    }

    #[test]
    fn test_validate_rejects_non_mapping() {
        let err = validate(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, BotError::ResponseType { found: "list" }));

        let err = validate(json!("homeworks")).unwrap_err();
        assert!(matches!(err, BotError::ResponseType { found: "string" }));
    }

    #[test]
    fn test_validate_rejects_missing_keys() {
        let err = validate(json!({"current_date": 1})).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("homeworks")));

        let err = validate(json!({"homeworks": []})).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("current_date")));
    }

    #[test]
    fn test_validate_rejects_non_list_homeworks() {
        let err = validate(json!({"homeworks": {"status": "approved"}, "current_date": 1}))
            .unwrap_err();
        assert!(matches!(err, BotError::HomeworksFieldType { found: "dict" }));
    }

    #[test]
    fn test_latest_homework_takes_first_record() {
        let response = json!({
            "homeworks": [
                {"status": "approved", "homework_name": "newest"},
                {"status": "rejected", "homework_name": "older"}
            ],
            "current_date": 1000
        });
        let latest = latest_homework(&response).unwrap();
        assert_eq!(latest["homework_name"], "newest");

        let empty = json!({"homeworks": [], "current_date": 1000});
        assert!(latest_homework(&empty).is_none());
    }

    #[test]
    fn test_current_date_requires_integer() {
        assert_eq!(current_date(&json!({"current_date": 1000})).unwrap(), 1000);

        let err = current_date(&json!({"current_date": "yesterday"})).unwrap_err();
        assert!(matches!(err, BotError::CurrentDateFieldType { found: "string" }));

        let err = current_date(&json!({"current_date": 10.5})).unwrap_err();
        assert!(matches!(err, BotError::CurrentDateFieldType { found: "number" }));
    }

    #[test]
    fn test_describe_none_is_nothing_new() {
        assert_eq!(describe(None).unwrap(), NOTHING_NEW);
    }

    #[test]
    fn test_describe_approved() {
        let homework = json!({"status": "approved", "homework_name": "X"});
        let message = describe(Some(&homework)).unwrap();
        assert_eq!(
            message,
            "Изменился статус проверки работы \"X\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
        assert!(message.contains(Verdict::Approved.text()));
    }

    #[test]
    fn test_describe_is_deterministic() {
        let homework = json!({"status": "reviewing", "homework_name": "hw2", "id": 7});
        assert_eq!(
            describe(Some(&homework)).unwrap(),
            describe(Some(&homework)).unwrap()
        );
    }

    #[test]
    fn test_describe_rejects_bad_records() {
        let err = describe(Some(&json!("approved"))).unwrap_err();
        assert!(matches!(err, BotError::HomeworkType { found: "string" }));

        let err = describe(Some(&json!({"homework_name": "X"}))).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("status")));

        let err = describe(Some(&json!({"status": "lost", "homework_name": "X"}))).unwrap_err();
        assert!(matches!(err, BotError::UnexpectedStatus(ref s) if s == "lost"));

        let err = describe(Some(&json!({"status": "approved"}))).unwrap_err();
        assert!(matches!(err, BotError::MissingKey("homework_name")));
    }

    #[test]
    fn test_unknown_status_checked_before_name() {
        let err = describe(Some(&json!({"status": 3}))).unwrap_err();
        assert!(matches!(err, BotError::UnexpectedStatus(ref s) if s == "3"));
    }
}
