//! Form input validation.
//!
//! Each form has a raw input type (what the browser posts) and a validated
//! output type. Validation never stops at the first problem: every failing
//! rule contributes a [`FieldError`] so the caller can show all of them.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Availability, Email, EmailError, PaymentMethod, Price, Role};

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 6;
/// Maximum username length.
pub const MAX_USERNAME_LENGTH: usize = 150;
/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Characters that count as "special" in a password.
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "!@#$%^&*()";

const MAX_PRODUCT_NAME_LENGTH: usize = 50;
const MAX_CATEGORY_LENGTH: usize = 15;
const MAX_FULL_NAME_LENGTH: usize = 100;
const MAX_PHONE_LENGTH: usize = 15;

const REQUIRED: &str = "This field is required.";

// =============================================================================
// Error Collection
// =============================================================================

/// A single validation failure attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field (`__all__` for cross-field rules).
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// All validation failures found in one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed with {} error(s)", .errors.len())]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Field name used for errors not tied to a single field.
    pub const NON_FIELD: &'static str = "__all__";

    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// A collection holding one error.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error for `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All errors in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The messages, in order, without field names.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Messages recorded against one field.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// `Ok(value)` if nothing was recorded, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if any error was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Trim `value` and record an error if it is empty or longer than `max`.
fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if let Some(max) = max {
        let len = value.chars().count();
        if len > max {
            errors.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
        }
    }
    value.to_owned()
}

/// Trim an optional value, mapping blank input to `None`.
fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// Registration
// =============================================================================

/// Raw sign-up form.
///
/// Absent fields deserialize as empty and are reported by `validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupInput {
    pub username: String,
    pub email: Option<String>,
    pub password1: String,
    pub password2: String,
    pub user_type: String,
}

/// A validated registration request.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub email: Option<Email>,
    pub password: String,
    pub role: Role,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Record every username rule `username` breaks.
pub fn check_username(errors: &mut ValidationErrors, username: &str) {
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        errors.add(
            "username",
            format!("Username must be at least {MIN_USERNAME_LENGTH} characters long."),
        );
    } else if len > MAX_USERNAME_LENGTH {
        errors.add(
            "username",
            format!("Ensure this value has at most {MAX_USERNAME_LENGTH} characters (it has {len})."),
        );
    }
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        errors.add(
            "username",
            "Username can only contain letters, numbers, and underscores.",
        );
    }
}

/// Record every password complexity rule `password` breaks.
pub fn check_password(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            field,
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long."),
        );
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.add(field, "Password must contain at least one uppercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.add(field, "Password must contain at least one number.");
    }
    if !password
        .chars()
        .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c))
    {
        errors.add(
            field,
            format!(
                "Password must contain at least one special character ({PASSWORD_SPECIAL_CHARACTERS})."
            ),
        );
    }
}

/// Parse `email`, recording why it is rejected.
pub fn check_email(errors: &mut ValidationErrors, email: &str) -> Option<Email> {
    match Email::parse(email) {
        Ok(email) => Some(email),
        Err(EmailError::TooLong { max, len }) => {
            errors.add(
                "email",
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
            None
        }
        Err(_) => {
            errors.add("email", "Enter a valid email address.");
            None
        }
    }
}

impl SignupInput {
    /// Validate the sign-up form.
    ///
    /// # Errors
    ///
    /// Returns every failing rule across all fields.
    pub fn validate(&self) -> Result<Registration, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = self.username.trim().to_owned();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else {
            check_username(&mut errors, &username);
        }

        let email = optional_text(self.email.as_deref())
            .and_then(|email| check_email(&mut errors, &email));

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        } else {
            check_password(&mut errors, "password1", &self.password1);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            errors.add(ValidationErrors::NON_FIELD, "Passwords do not match.");
        }

        let role = match self.user_type.trim() {
            "" => {
                errors.add("user_type", REQUIRED);
                None
            }
            tag => match tag.parse::<Role>() {
                Ok(role) if role.is_self_selectable() => Some(role),
                Ok(role) => {
                    errors.add(
                        "user_type",
                        format!(
                            "Select a valid choice. {} is not one of the available choices.",
                            role.as_str()
                        ),
                    );
                    None
                }
                Err(e) => {
                    errors.add("user_type", e.to_string());
                    None
                }
            },
        };

        match role {
            Some(role) if errors.is_empty() => Ok(Registration {
                username,
                email,
                password: self.password1.clone(),
                role,
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// Raw add/update product form.
///
/// Absent fields deserialize as empty and are reported by `validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    pub name: String,
    pub price: String,
    pub category: String,
    pub availability: Option<String>,
    pub description: Option<String>,
    /// Reference to an image already placed in file storage.
    pub image_url: Option<String>,
}

/// A validated product definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub category: String,
    pub availability: Availability,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl ProductInput {
    /// Validate the product form.
    ///
    /// # Errors
    ///
    /// Returns every failing rule across all fields.
    pub fn validate(&self) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", &self.name, Some(MAX_PRODUCT_NAME_LENGTH));
        let category = required_text(
            &mut errors,
            "category",
            &self.category,
            Some(MAX_CATEGORY_LENGTH),
        );

        let price = if self.price.trim().is_empty() {
            errors.add("price", REQUIRED);
            None
        } else {
            Price::parse_catalog(&self.price)
                .map_err(|e| errors.add("price", e.to_string()))
                .ok()
        };

        let availability = match optional_text(self.availability.as_deref()) {
            None => Availability::default(),
            Some(tag) => tag.parse().unwrap_or_else(|e: crate::types::InvalidChoice| {
                errors.add("availability", e.to_string());
                Availability::default()
            }),
        };

        match price {
            Some(price) if errors.is_empty() => Ok(ProductDraft {
                name,
                price,
                category,
                availability,
                description: optional_text(self.description.as_deref()),
                image_url: optional_text(self.image_url.as_deref()),
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Checkout
// =============================================================================

/// Raw checkout form.
///
/// Absent fields deserialize as empty and are reported by `validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutInput {
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: Option<String>,
    /// Checkbox value; browsers omit the field entirely when unchecked.
    pub accept_terms: Option<String>,
}

/// Validated shipping and payment details for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
}

fn checkbox_checked(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}

impl CheckoutInput {
    /// Validate the checkout form.
    ///
    /// # Errors
    ///
    /// Returns every failing rule across all fields.
    pub fn validate(&self) -> Result<ShippingDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let full_name = required_text(
            &mut errors,
            "full_name",
            &self.full_name,
            Some(MAX_FULL_NAME_LENGTH),
        );
        let address = required_text(&mut errors, "address", &self.address, None);
        let phone = required_text(&mut errors, "phone", &self.phone, Some(MAX_PHONE_LENGTH));

        let payment_method = match optional_text(self.payment_method.as_deref()) {
            None => {
                errors.add("payment_method", REQUIRED);
                None
            }
            Some(tag) => tag
                .parse::<PaymentMethod>()
                .map_err(|e| errors.add("payment_method", e.to_string()))
                .ok(),
        };

        if !checkbox_checked(self.accept_terms.as_deref()) {
            errors.add("accept_terms", "You must accept the terms and conditions.");
        }

        match payment_method {
            Some(payment_method) if errors.is_empty() => Ok(ShippingDetails {
                full_name,
                address,
                phone,
                payment_method,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signup(username: &str, password1: &str, password2: &str, user_type: &str) -> SignupInput {
        SignupInput {
            username: username.to_owned(),
            email: None,
            password1: password1.to_owned(),
            password2: password2.to_owned(),
            user_type: user_type.to_owned(),
        }
    }

    #[test]
    fn test_weak_password_reports_every_missing_class() {
        let errors = signup("shopper_1", "abcdefgh", "abcdefgh", "enduser")
            .validate()
            .unwrap_err();

        let messages = errors.for_field("password1");
        assert_eq!(messages.len(), 3);
        assert!(messages.contains(&"Password must contain at least one uppercase letter."));
        assert!(messages.contains(&"Password must contain at least one number."));
        assert!(
            messages.contains(&"Password must contain at least one special character (!@#$%^&*()).")
        );
    }

    #[test]
    fn test_valid_signup() {
        let registration = signup("shopper_1", "Secr3t!pw", "Secr3t!pw", "owner")
            .validate()
            .unwrap();
        assert_eq!(registration.username, "shopper_1");
        assert_eq!(registration.role, Role::Owner);
        assert!(registration.email.is_none());
    }

    #[test]
    fn test_username_rules_are_collected() {
        let errors = signup("a-b", "Secr3t!pw", "Secr3t!pw", "enduser")
            .validate()
            .unwrap_err();
        assert_eq!(errors.for_field("username").len(), 2);
    }

    #[test]
    fn test_mismatched_confirmation() {
        let errors = signup("shopper_1", "Secr3t!pw", "Secr3t!px", "enduser")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.for_field(ValidationErrors::NON_FIELD),
            vec!["Passwords do not match."]
        );
    }

    #[test]
    fn test_admin_role_cannot_be_self_selected() {
        let errors = signup("shopper_1", "Secr3t!pw", "Secr3t!pw", "admin")
            .validate()
            .unwrap_err();
        assert_eq!(errors.for_field("user_type").len(), 1);
    }

    #[test]
    fn test_signup_rejects_malformed_email() {
        let mut input = signup("shopper_1", "Secr3t!pw", "Secr3t!pw", "enduser");
        input.email = Some("not-an-email".to_owned());
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.for_field("email"), vec!["Enter a valid email address."]);

        input.email = Some("a@b@c".to_owned());
        assert_eq!(input.validate().unwrap_err().for_field("email").len(), 1);

        input.email = Some("   ".to_owned());
        assert!(input.validate().unwrap().email.is_none());
    }

    #[test]
    fn test_signup_email_length_is_capped() {
        let mut input = signup("shopper_1", "Secr3t!pw", "Secr3t!pw", "enduser");
        input.email = Some(format!("{}@example.com", "a".repeat(250)));
        assert_eq!(
            input.validate().unwrap_err().for_field("email"),
            vec!["Ensure this value has at most 254 characters (it has 262)."]
        );

        input.email = Some("shopper@example.com".to_owned());
        let registration = input.validate().unwrap();
        assert_eq!(registration.email.unwrap().as_str(), "shopper@example.com");
    }

    #[test]
    fn test_registration_debug_redacts_password() {
        let registration = signup("shopper_1", "Secr3t!pw", "Secr3t!pw", "enduser")
            .validate()
            .unwrap();
        let debug = format!("{registration:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("Secr3t!pw"));
    }

    #[test]
    fn test_product_form() {
        let input = ProductInput {
            name: " Mango ".to_owned(),
            price: "12.50".to_owned(),
            category: "fruit".to_owned(),
            availability: None,
            description: Some(String::new()),
            image_url: Some("product_images/mango.jpg".to_owned()),
        };
        let draft = input.validate().unwrap();
        assert_eq!(draft.name, "Mango");
        assert_eq!(draft.price, Price::from_cents(1250));
        assert_eq!(draft.availability, Availability::InStock);
        assert!(draft.description.is_none());
        assert_eq!(draft.image_url.as_deref(), Some("product_images/mango.jpg"));
    }

    #[test]
    fn test_product_form_collects_errors() {
        let input = ProductInput {
            name: String::new(),
            price: "1.234".to_owned(),
            category: "a category that is far too long".to_owned(),
            availability: Some("gone".to_owned()),
            description: None,
            image_url: None,
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.for_field("name"), vec![REQUIRED]);
        assert_eq!(errors.for_field("price").len(), 1);
        assert_eq!(errors.for_field("category").len(), 1);
        assert_eq!(errors.for_field("availability").len(), 1);
    }

    #[test]
    fn test_checkout_form() {
        let input = CheckoutInput {
            full_name: "Ada Lovelace".to_owned(),
            address: "12 Analytical Row".to_owned(),
            phone: "555-0100".to_owned(),
            payment_method: Some("paypal".to_owned()),
            accept_terms: Some("on".to_owned()),
        };
        let details = input.validate().unwrap();
        assert_eq!(details.payment_method, PaymentMethod::PayPal);
    }

    #[test]
    fn test_checkout_form_requires_every_field_and_terms() {
        let input = CheckoutInput {
            full_name: " ".to_owned(),
            address: String::new(),
            phone: "0123456789012345".to_owned(),
            payment_method: Some("card".to_owned()),
            accept_terms: None,
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.for_field("full_name"), vec![REQUIRED]);
        assert_eq!(errors.for_field("address"), vec![REQUIRED]);
        assert_eq!(errors.for_field("phone").len(), 1);
        assert_eq!(errors.for_field("payment_method").len(), 1);
        assert_eq!(
            errors.for_field("accept_terms"),
            vec!["You must accept the terms and conditions."]
        );
    }

    #[test]
    fn test_absent_fields_are_reported_as_required() {
        let checkout: CheckoutInput =
            serde_json::from_value(serde_json::json!({ "accept_terms": "on" })).unwrap();
        let errors = checkout.validate().unwrap_err();
        for field in ["full_name", "address", "phone", "payment_method"] {
            assert_eq!(errors.for_field(field), vec![REQUIRED], "{field}");
        }

        let product: ProductInput =
            serde_json::from_value(serde_json::json!({ "price": "1" })).unwrap();
        let errors = product.validate().unwrap_err();
        assert_eq!(errors.for_field("name"), vec![REQUIRED]);
        assert_eq!(errors.for_field("category"), vec![REQUIRED]);

        let signup: SignupInput =
            serde_json::from_value(serde_json::json!({ "username": "abc" })).unwrap();
        let errors = signup.validate().unwrap_err();
        assert_eq!(errors.for_field("password1"), vec![REQUIRED]);
        assert_eq!(errors.for_field("password2"), vec![REQUIRED]);
        assert_eq!(errors.for_field("user_type"), vec![REQUIRED]);
    }

    #[test]
    fn test_errors_serialize_as_list() {
        let errors = ValidationErrors::single("phone", REQUIRED);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "phone");
        assert_eq!(json[0]["message"], REQUIRED);
    }
}
