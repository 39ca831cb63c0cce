use axum_helpers::params::parse_lenient_int;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};

/// Account document as stored in the `accounts` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Account {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Student number, kept as submitted
    pub nim: String,
    pub name: String,
    pub email: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /banking/accounts`.
///
/// Fields are loose JSON: `nim` may be a number or a string, and any field
/// that is absent, `null`, `false`, `0` or `""` makes the request invalid.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateAccount {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "1202")]
    pub nim: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Jane Doe")]
    pub name: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "jane@example.com")]
    pub email: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 1500.0)]
    pub balance: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountResponse {
    pub message: String,
    pub account: Account,
}

impl CreateAccount {
    /// Check the body and build the account to store.
    ///
    /// Every field must be present and truthy, then the NIM must parse to an
    /// even integer.
    pub fn into_account(self) -> AccountResult<Account> {
        let (Some(nim), Some(name), Some(email), Some(balance)) = (
            self.nim.filter(is_truthy),
            self.name.filter(is_truthy),
            self.email.filter(is_truthy),
            self.balance.filter(is_truthy),
        ) else {
            return Err(AccountError::InvalidBody);
        };

        match nim_number(&nim) {
            Some(n) if n % 2 == 0 => {}
            _ => return Err(AccountError::OddNim),
        }

        let balance = as_number(&balance).ok_or(AccountError::InvalidBody)?;

        Ok(Account {
            id: Uuid::now_v7(),
            nim: as_text(nim),
            name: as_text(name),
            email: as_text(email),
            balance,
            created_at: Utc::now(),
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Integer value of a NIM: a number is truncated, a string contributes its
/// leading integer (`"12ab"` is 12, `"0x10"` is 16). Anything else has none.
fn nim_number(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < 9.0e18)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => parse_lenient_int(s),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn as_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> CreateAccount {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_account() {
        let account = body(json!({
            "nim": "1202",
            "name": "Jane",
            "email": "jane@example.com",
            "balance": 1500
        }))
        .into_account()
        .unwrap();

        assert_eq!(account.nim, "1202");
        assert_eq!(account.balance, 1500.0);
    }

    #[test]
    fn test_numeric_nim_is_stored_as_text() {
        let account = body(json!({"nim": 44, "name": "J", "email": "j@x.io", "balance": 1.5}))
            .into_account()
            .unwrap();
        assert_eq!(account.nim, "44");
    }

    #[test]
    fn test_falsy_fields_are_invalid() {
        let cases = [
            json!({"name": "J", "email": "j@x.io", "balance": 10}),
            json!({"nim": "", "name": "J", "email": "j@x.io", "balance": 10}),
            json!({"nim": 0, "name": "J", "email": "j@x.io", "balance": 10}),
            json!({"nim": "12", "name": "", "email": "j@x.io", "balance": 10}),
            json!({"nim": "12", "name": "J", "email": null, "balance": 10}),
            json!({"nim": "12", "name": "J", "email": "j@x.io", "balance": 0}),
        ];
        for case in cases {
            assert!(matches!(
                body(case).into_account(),
                Err(AccountError::InvalidBody)
            ));
        }
    }

    #[test]
    fn test_odd_or_unparseable_nim() {
        for nim in [json!("1203"), json!(7), json!("abc"), json!(true), json!("0x11")] {
            let result = body(json!({"nim": nim, "name": "J", "email": "j@x.io", "balance": 10}))
                .into_account();
            assert!(matches!(result, Err(AccountError::OddNim)));
        }
    }

    #[test]
    fn test_nim_leading_digits() {
        assert_eq!(nim_number(&json!("  42ab")), Some(42));
        assert_eq!(nim_number(&json!("-8")), Some(-8));
        assert_eq!(nim_number(&json!("x1")), None);
        assert_eq!(nim_number(&json!("0x10")), Some(16));
        assert_eq!(nim_number(&json!(12.9)), Some(12));
    }

    #[test]
    fn test_even_hex_nim_is_accepted_verbatim() {
        let account = body(json!({"nim": "0x10", "name": "J", "email": "j@x.io", "balance": 3}))
            .into_account()
            .unwrap();
        assert_eq!(account.nim, "0x10");
    }

    #[test]
    fn test_non_numeric_balance_is_invalid() {
        let result = body(json!({"nim": "12", "name": "J", "email": "j@x.io", "balance": "lots"}))
            .into_account();
        assert!(matches!(result, Err(AccountError::InvalidBody)));
    }
}
