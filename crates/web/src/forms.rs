//! Form input and local validation.
//!
//! Every form is checked here before any backend call is made. A
//! [`ValidationError`] means zero requests were sent; its display text is the
//! message shown next to the form.

use axum::extract::Multipart;
use laundry_core::{Email, EmailError, MonthFilter, OrderId, PeriodError, UserId};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::api::{ImageUpload, NewAccount, NewOrderRequest};

/// Input rejected before reaching the backend.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please enter username and password.")]
    MissingCredentials,

    #[error("Please fill all fields.")]
    MissingFields,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please enter a valid email address.")]
    InvalidEmail(#[source] EmailError),

    #[error("Enter valid item type and quantity.")]
    InvalidItem,

    #[error("Please fill all required fields.")]
    MissingRequired,

    #[error("Please enter a valid Order ID.")]
    MissingOrderId,

    #[error("Please choose a valid month and year.")]
    InvalidPeriod(#[from] PeriodError),

    #[error("The uploaded form could not be read.")]
    Upload(String),
}

/// Trimmed value, or `None` when blank.
fn present(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse a strictly positive quantity.
fn parse_quantity(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|q| *q > 0)
}

// =============================================================================
// Auth
// =============================================================================

/// Login form data, shared by the user and admin login pages.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Validated login credentials.
#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCredentials`] if either field is blank.
    pub fn validate(self) -> Result<Credentials, ValidationError> {
        let username = present(&self.username).ok_or(ValidationError::MissingCredentials)?;
        let password = present(&self.password).ok_or(ValidationError::MissingCredentials)?;
        Ok(Credentials {
            username: username.to_owned(),
            password: SecretString::from(password.to_owned()),
        })
    }
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub plan: String,
}

impl RegisterForm {
    /// # Errors
    ///
    /// Returns the first problem found: a blank field, mismatched passwords,
    /// then a malformed email.
    pub fn validate(&self) -> Result<NewAccount, ValidationError> {
        let fields = [
            &self.username,
            &self.password,
            &self.confirm_password,
            &self.email,
            &self.phone,
            &self.plan,
        ];
        if fields.iter().any(|field| present(field).is_none()) {
            return Err(ValidationError::MissingFields);
        }
        if self.password.trim() != self.confirm_password.trim() {
            return Err(ValidationError::PasswordMismatch);
        }
        let email = Email::parse(&self.email).map_err(ValidationError::InvalidEmail)?;

        Ok(NewAccount {
            username: self.username.trim().to_owned(),
            password: SecretString::from(self.password.trim().to_owned()),
            email,
            phone: self.phone.trim().to_owned(),
            plan: self.plan.trim().to_owned(),
        })
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Raw order request fields read from a multipart body.
#[derive(Debug, Default)]
pub struct OrderRequestForm {
    pub item_type: String,
    pub quantity: String,
    pub note: String,
    pub payment_method: String,
    pub hostel_name: String,
    pub room_number: String,
    pub pickup_time_slot: String,
    pub image: Option<ImageUpload>,
}

impl OrderRequestForm {
    /// Read every part of the multipart body. Unknown parts are ignored and
    /// an empty file part counts as no image.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Upload`] if the body is malformed.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ValidationError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ValidationError::Upload(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "image" {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ValidationError::Upload(e.to_string()))?;
                if !bytes.is_empty() {
                    form.image = Some(ImageUpload {
                        file_name: if file_name.is_empty() {
                            "upload".to_string()
                        } else {
                            file_name
                        },
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| ValidationError::Upload(e.to_string()))?;
            match name.as_str() {
                "item_type" => form.item_type = value,
                "quantity" => form.quantity = value,
                "note" => form.note = value,
                "payment_method" => form.payment_method = value,
                "hostel_name" => form.hostel_name = value,
                "room_number" => form.room_number = value,
                "pickup_time_slot" => form.pickup_time_slot = value,
                _ => {}
            }
        }

        Ok(form)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidItem`] for a blank item or a
    /// non-positive quantity, then [`ValidationError::MissingRequired`] for
    /// any other blank required field.
    pub fn validate(self, user_id: UserId) -> Result<NewOrderRequest, ValidationError> {
        let item_type = present(&self.item_type).ok_or(ValidationError::InvalidItem)?;
        let quantity = parse_quantity(&self.quantity).ok_or(ValidationError::InvalidItem)?;

        let required = [
            &self.payment_method,
            &self.hostel_name,
            &self.room_number,
            &self.pickup_time_slot,
        ];
        if required.iter().any(|field| present(field).is_none()) {
            return Err(ValidationError::MissingRequired);
        }

        Ok(NewOrderRequest {
            user_id,
            item_type: item_type.to_owned(),
            quantity,
            payment_method: self.payment_method.trim().to_owned(),
            hostel_name: self.hostel_name.trim().to_owned(),
            room_number: self.room_number.trim().to_owned(),
            pickup_time_slot: self.pickup_time_slot.trim().to_owned(),
            note: present(&self.note).map(str::to_owned),
            image: self.image,
        })
    }
}

/// Price estimate query.
///
/// The estimate button submits the whole request form, so the other fields
/// are kept to refill it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateQuery {
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub hostel_name: String,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub pickup_time_slot: String,
}

impl EstimateQuery {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidItem`] for a blank item or a
    /// non-positive quantity.
    pub fn validate(&self) -> Result<(String, u32), ValidationError> {
        let item_type = present(&self.item_type).ok_or(ValidationError::InvalidItem)?;
        let quantity = parse_quantity(&self.quantity).ok_or(ValidationError::InvalidItem)?;
        Ok((item_type.to_owned(), quantity))
    }
}

/// Order history filter query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl HistoryQuery {
    /// `/orders` path carrying the same filter, for redirects back to the list.
    #[must_use]
    pub fn orders_path(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        if let Some(month) = self.month.as_deref() {
            query.append_pair("month", month);
        }
        if let Some(year) = self.year.as_deref() {
            query.append_pair("year", year);
        }
        let query = query.finish();
        if query.is_empty() {
            "/orders".to_string()
        } else {
            format!("/orders?{query}")
        }
    }

    /// `month=..&year=..` with blanks for missing fields.
    #[must_use]
    pub fn query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("month", self.month.as_deref().unwrap_or_default())
            .append_pair("year", self.year.as_deref().unwrap_or_default())
            .finish()
    }

    /// Whether neither field was submitted at all.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPeriod`] for an out-of-range value.
    pub fn validate(&self) -> Result<MonthFilter, ValidationError> {
        Ok(MonthFilter::parse(
            self.month.as_deref(),
            self.year.as_deref(),
        )?)
    }
}

/// Feedback form data.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub feedback: String,
    /// Active history filter, restored after the redirect.
    #[serde(flatten)]
    pub filter: HistoryQuery,
}

impl FeedbackForm {
    /// Trimmed feedback text; `None` means nothing should be sent.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        present(&self.feedback)
    }
}

/// Track lookup query.
#[derive(Debug, Default, Deserialize)]
pub struct TrackQuery {
    pub order_id: Option<String>,
}

impl TrackQuery {
    /// `Ok(None)` when no lookup was requested.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingOrderId`] when the field was
    /// submitted blank.
    pub fn validate(&self) -> Result<Option<OrderId>, ValidationError> {
        match &self.order_id {
            None => Ok(None),
            Some(raw) => present(raw)
                .map(|id| Some(OrderId::new(id)))
                .ok_or(ValidationError::MissingOrderId),
        }
    }
}
