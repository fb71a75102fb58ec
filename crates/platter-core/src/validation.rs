//! # Validation Module
//!
//! The single validation layer at the boundary of order placement.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  └── Immediate user feedback on the checkout form                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization (serde)                                      │
//! │  └── Shape: PlaceOrderRequest parses or the request is rejected        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  ├── Every field checked, every failure collected                      │
//! │  └── Ok(ValidatedOrder) | Err(ValidationErrors { errors: [...] })      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  └── NOT NULL / CHECK / UNIQUE constraints                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use platter_core::validation::validate_quantity;
//!
//! assert!(validate_quantity("items[0].qty", 2).is_ok());
//! assert!(validate_quantity("items[0].qty", 0).is_err());
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationErrors};
use crate::types::{DeliveryAddress, PaymentMethod, RequestedLine};
use crate::{MAX_LINE_QUANTITY, MAX_ORDER_LINES};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a client-supplied idempotency key.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 100;

const MAX_ADDRESS_FIELD_LEN: usize = 200;

// =============================================================================
// Request Types
// =============================================================================

/// Delivery address as submitted by the checkout form.
///
/// Every field is optional at this layer so that a missing field becomes
/// a field-level validation error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct AddressInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
}

/// The body of a place-order call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<RequestedLine>,
    #[serde(default)]
    pub address: AddressInput,
    /// Raw payment method; must be one of `UPI`, `CARD`, `COD`.
    #[serde(default)]
    pub payment_method: String,
    /// Optional client token; repeating it returns the original order.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// A request that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub lines: Vec<RequestedLine>,
    pub address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub idempotency_key: Option<String>,
}

impl ValidatedOrder {
    /// Dish ids in request order.
    pub fn dish_ids(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.dish_id.clone()).collect()
    }
}

impl PlaceOrderRequest {
    /// Runs every check and either returns the typed order or all failures.
    pub fn validate(&self) -> Result<ValidatedOrder, ValidationErrors> {
        let mut errors = Vec::new();

        let lines = collect(&mut errors, validate_lines(&self.items));
        let address = collect(&mut errors, validate_address(&self.address));
        let payment_method = collect(
            &mut errors,
            validate_payment_method(&self.payment_method).map_err(|e| vec![e]),
        );
        let idempotency_key = collect(
            &mut errors,
            validate_idempotency_key(self.idempotency_key.as_deref()).map_err(|e| vec![e]),
        );

        match (lines, address, payment_method, idempotency_key) {
            (Some(lines), Some(address), Some(payment_method), Some(idempotency_key)) if errors.is_empty() => {
                Ok(ValidatedOrder {
                    lines,
                    address,
                    payment_method,
                    idempotency_key,
                })
            }
            _ => Err(ValidationErrors { errors }),
        }
    }
}

fn collect<T>(errors: &mut Vec<ValidationError>, result: Result<T, Vec<ValidationError>>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(mut found) => {
            errors.append(&mut found);
            None
        }
    }
}

// =============================================================================
// Line Validators
// =============================================================================

/// Validates the requested items.
///
/// ## Rules
/// - At least one line, at most `MAX_ORDER_LINES`
/// - Each dish id is a UUID and appears once
/// - Each quantity is within `1..=MAX_LINE_QUANTITY`
pub fn validate_lines(items: &[RequestedLine]) -> Result<Vec<RequestedLine>, Vec<ValidationError>> {
    if items.is_empty() {
        return Err(vec![ValidationError::Required {
            field: "items".to_string(),
        }]);
    }

    if items.len() > MAX_ORDER_LINES {
        return Err(vec![ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_ORDER_LINES as i64,
        }]);
    }

    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut lines = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let id_field = format!("items[{}].dishId", i);
        let dish_id = item.dish_id.trim();

        match validate_uuid(&id_field, dish_id) {
            Ok(()) if !seen.insert(dish_id.to_string()) => errors.push(ValidationError::Duplicate {
                field: id_field,
                value: dish_id.to_string(),
            }),
            Ok(()) => {}
            Err(e) => errors.push(e),
        }

        if let Err(e) = validate_quantity(&format!("items[{}].qty", i), item.qty) {
            errors.push(e);
        }

        lines.push(RequestedLine {
            dish_id: dish_id.to_string(),
            qty: item.qty,
        });
    }

    if errors.is_empty() {
        Ok(lines)
    } else {
        Err(errors)
    }
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use platter_core::validation::validate_uuid;
///
/// assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Address Validators
// =============================================================================

/// Validates a required text field and returns it trimmed.
pub fn validate_required(field: &str, value: Option<&str>) -> ValidationResult<String> {
    let value = value.map(str::trim).unwrap_or_default();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_ADDRESS_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ADDRESS_FIELD_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates the delivery address.
///
/// ## Rules
/// - fullName, phone, line1, city, pincode are required
/// - line2 is optional; a blank line2 is dropped
pub fn validate_address(input: &AddressInput) -> Result<DeliveryAddress, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut required = |name: &str, value: &Option<String>| {
        validate_required(&format!("address.{}", name), value.as_deref())
            .map_err(|e| errors.push(e))
            .ok()
    };

    let full_name = required("fullName", &input.full_name);
    let phone = required("phone", &input.phone);
    let line1 = required("line1", &input.line1);
    let city = required("city", &input.city);
    let pincode = required("pincode", &input.pincode);

    let line2 = match input.line2.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(v) if v.chars().count() > MAX_ADDRESS_FIELD_LEN => {
            errors.push(ValidationError::TooLong {
                field: "address.line2".to_string(),
                max: MAX_ADDRESS_FIELD_LEN,
            });
            None
        }
        Some(v) => Some(v.to_string()),
    };

    match (full_name, phone, line1, city, pincode) {
        (Some(full_name), Some(phone), Some(line1), Some(city), Some(pincode)) if errors.is_empty() => {
            Ok(DeliveryAddress {
                full_name,
                phone,
                line1,
                line2,
                city,
                pincode,
            })
        }
        _ => Err(errors),
    }
}

// =============================================================================
// Payment / Token Validators
// =============================================================================

/// Validates the payment method against the fixed set.
pub fn validate_payment_method(value: &str) -> ValidationResult<PaymentMethod> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "paymentMethod".to_string(),
        });
    }

    value.parse().map_err(|_| ValidationError::NotAllowed {
        field: "paymentMethod".to_string(),
        allowed: PaymentMethod::ALL.iter().map(|m| m.as_str().to_string()).collect(),
    })
}

/// Validates an optional idempotency key; blank keys count as absent.
pub fn validate_idempotency_key(key: Option<&str>) -> ValidationResult<Option<String>> {
    match key.map(str::trim) {
        None | Some("") => Ok(None),
        Some(k) if k.len() > MAX_IDEMPOTENCY_KEY_LEN => Err(ValidationError::TooLong {
            field: "idempotencyKey".to_string(),
            max: MAX_IDEMPOTENCY_KEY_LEN,
        }),
        Some(k) => Ok(Some(k.to_string())),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DISH_A: &str = "550e8400-e29b-41d4-a716-446655440000";
    const DISH_B: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    fn address() -> AddressInput {
        AddressInput {
            full_name: Some("Asha Rao".to_string()),
            phone: Some("9876543210".to_string()),
            line1: Some("12 MG Road".to_string()),
            line2: Some("   ".to_string()),
            city: Some("Bengaluru".to_string()),
            pincode: Some("560001".to_string()),
        }
    }

    fn request() -> PlaceOrderRequest {
        PlaceOrderRequest {
            items: vec![
                RequestedLine {
                    dish_id: DISH_A.to_string(),
                    qty: 1,
                },
                RequestedLine {
                    dish_id: DISH_B.to_string(),
                    qty: 2,
                },
            ],
            address: address(),
            payment_method: "COD".to_string(),
            idempotency_key: None,
        }
    }

    #[test]
    fn test_valid_request() {
        let validated = request().validate().unwrap();
        assert_eq!(validated.lines.len(), 2);
        assert_eq!(validated.payment_method, PaymentMethod::Cod);
        assert_eq!(validated.address.line2, None);
        assert_eq!(validated.dish_ids(), vec![DISH_A.to_string(), DISH_B.to_string()]);
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("qty", 1).is_ok());
        assert!(validate_quantity("qty", 999).is_ok());
        assert!(validate_quantity("qty", 0).is_err());
        assert!(validate_quantity("qty", -1).is_err());
        assert!(validate_quantity("qty", 1000).is_err());
    }

    #[test]
    fn test_collects_every_failing_field() {
        let mut req = request();
        req.items[1].qty = 0;
        req.address.city = None;
        req.address.phone = Some("  ".to_string());
        req.payment_method = "PAYPAL".to_string();

        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.has_field("items[1].qty"));
        assert!(errors.has_field("address.city"));
        assert!(errors.has_field("address.phone"));
        assert!(errors.has_field("paymentMethod"));
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut req = request();
        req.items.clear();
        let errors = req.validate().unwrap_err();
        assert!(errors.has_field("items"));
    }

    #[test]
    fn test_duplicate_dish_rejected() {
        let mut req = request();
        req.items[1].dish_id = DISH_A.to_string();
        let errors = req.validate().unwrap_err();
        assert!(matches!(errors.errors[0], ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_malformed_dish_id_rejected() {
        let mut req = request();
        req.items[0].dish_id = "64f1c0ffee".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.has_field("items[0].dishId"));
    }

    #[test]
    fn test_payment_method_is_case_sensitive() {
        assert_eq!(validate_payment_method("UPI"), Ok(PaymentMethod::Upi));
        assert!(matches!(
            validate_payment_method("upi"),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!(matches!(
            validate_payment_method(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_idempotency_key() {
        assert_eq!(validate_idempotency_key(None), Ok(None));
        assert_eq!(validate_idempotency_key(Some(" ")), Ok(None));
        assert_eq!(validate_idempotency_key(Some("abc")), Ok(Some("abc".to_string())));
        assert!(validate_idempotency_key(Some(&"k".repeat(101))).is_err());
    }

    #[test]
    fn test_request_parses_from_checkout_json() {
        let json = format!(
            r#"{{
                "items": [{{"dishId": "{DISH_A}", "qty": 2}}],
                "address": {{"fullName": "Asha", "phone": "1", "line1": "x", "city": "y", "pincode": "z"}},
                "paymentMethod": "CARD"
            }}"#
        );
        let req: PlaceOrderRequest = serde_json::from_str(&json).unwrap();
        let validated = req.validate().unwrap();
        assert_eq!(validated.payment_method, PaymentMethod::Card);
        assert_eq!(validated.lines[0].qty, 2);
    }
}
