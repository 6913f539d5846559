//! Checks the front end runs before a request is sent.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::accounts::{
    dto::{LoginRequest, SignupRequest},
    services::is_valid_email,
};
use crate::catalog::handlers::CarQuery;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all basic fields")]
    MissingBasicFields,
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please fill in all license info")]
    MissingLicenseInfo,
    #[error("Please fill in all payment info")]
    MissingPaymentInfo,
    #[error("Please provide your residential address")]
    MissingResidentialAddress,
    #[error("Please agree to all legal terms")]
    TermsNotAccepted,
    #[error("Please select pickup location, date, and time to search for cars.")]
    IncompleteSearch,
}

/// `+`, digits, spaces, dashes and parentheses, with at least 10 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[\d\s\-()]+$").unwrap();
    }
    PHONE_RE.is_match(phone) && phone.chars().filter(char::is_ascii_digit).count() >= 10
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub date_of_birth: String,
    pub license_number: String,
    pub license_country: String,
    pub license_expiry: String,
    pub card_number: String,
    pub card_expiry: String,
    #[serde(rename = "cardCVV")]
    pub card_cvv: String,
    pub billing_address: String,
    pub residential_address: String,
    pub agree_to_terms: bool,
    pub agree_to_privacy: bool,
    pub agree_to_license: bool,
}

impl SignupForm {
    /// Sections are checked in the order the form shows them.
    pub fn validate(&self) -> Result<(), FormError> {
        let basic = [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.password,
            &self.confirm_password,
        ];
        if basic.iter().any(|v| blank(v)) {
            return Err(FormError::MissingBasicFields);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(FormError::InvalidEmail);
        }
        if !is_valid_phone(self.phone.trim()) {
            return Err(FormError::InvalidPhone);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        let license = [
            &self.date_of_birth,
            &self.license_number,
            &self.license_country,
            &self.license_expiry,
        ];
        if license.iter().any(|v| blank(v)) {
            return Err(FormError::MissingLicenseInfo);
        }
        let payment = [
            &self.card_number,
            &self.card_expiry,
            &self.card_cvv,
            &self.billing_address,
        ];
        if payment.iter().any(|v| blank(v)) {
            return Err(FormError::MissingPaymentInfo);
        }
        if blank(&self.residential_address) {
            return Err(FormError::MissingResidentialAddress);
        }
        if !(self.agree_to_terms && self.agree_to_privacy && self.agree_to_license) {
            return Err(FormError::TermsNotAccepted);
        }
        Ok(())
    }

    /// Validate and build the body sent to `POST /api/signup`. License and
    /// card details stay on the client.
    pub fn into_request(self) -> Result<SignupRequest, FormError> {
        self.validate()?;
        Ok(SignupRequest {
            first_name: Some(self.first_name),
            last_name: Some(self.last_name),
            email: Some(self.email),
            phone: Some(self.phone),
            password: Some(self.password),
            residential_address: Some(self.residential_address),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn into_request(self) -> Result<LoginRequest, FormError> {
        if blank(&self.email) || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(LoginRequest {
            email: Some(self.email),
            password: Some(self.password),
        })
    }
}

/// Home screen search box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub dropoff_date: String,
    pub dropoff_time: String,
}

impl SearchCriteria {
    pub fn validate(&self) -> Result<(), FormError> {
        if [&self.pickup_location, &self.pickup_date, &self.pickup_time]
            .iter()
            .any(|v| blank(v))
        {
            return Err(FormError::IncompleteSearch);
        }
        Ok(())
    }

    /// Listing query for this search. Only the pickup location filters cars.
    pub fn car_query(&self) -> Result<CarQuery, FormError> {
        self.validate()?;
        Ok(CarQuery {
            pickup_location: Some(self.pickup_location.trim().to_owned()),
            ..CarQuery::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_signup() -> SignupForm {
        SignupForm {
            first_name: "Maria".into(),
            last_name: "Santos".into(),
            email: "maria@example.com".into(),
            phone: "+63 (917) 555-0101".into(),
            password: "pass1234".into(),
            confirm_password: "pass1234".into(),
            date_of_birth: "1990-04-02".into(),
            license_number: "N01-23-456789".into(),
            license_country: "Philippines".into(),
            license_expiry: "2028-04-02".into(),
            card_number: "4111111111111111".into(),
            card_expiry: "12/28".into(),
            card_cvv: "123".into(),
            billing_address: "Makati".into(),
            residential_address: "Makati".into(),
            agree_to_terms: true,
            agree_to_privacy: true,
            agree_to_license: true,
        }
    }

    #[test]
    fn phone_format() {
        assert!(is_valid_phone("+63 917 555 0101"));
        assert!(is_valid_phone("(02) 8123-4567"));
        assert!(!is_valid_phone("0917 555"));
        assert!(!is_valid_phone("call 09175550101"));
    }

    #[test]
    fn complete_signup_passes_and_drops_card_details() {
        let request = complete_signup().into_request().unwrap();
        assert_eq!(request.email.as_deref(), Some("maria@example.com"));
        assert_eq!(request.residential_address.as_deref(), Some("Makati"));
    }

    #[test]
    fn signup_sections_in_order() {
        let mut form = complete_signup();
        form.confirm_password = "other".into();
        form.agree_to_privacy = false;
        assert_eq!(form.validate(), Err(FormError::PasswordMismatch));

        let form = SignupForm {
            card_cvv: String::new(),
            residential_address: " ".into(),
            ..complete_signup()
        };
        assert_eq!(form.validate(), Err(FormError::MissingPaymentInfo));

        let form = SignupForm {
            license_country: String::new(),
            ..complete_signup()
        };
        assert_eq!(form.validate(), Err(FormError::MissingLicenseInfo));

        let form = SignupForm {
            agree_to_license: false,
            ..complete_signup()
        };
        assert_eq!(form.validate(), Err(FormError::TermsNotAccepted));

        let form = SignupForm {
            phone: String::new(),
            ..complete_signup()
        };
        assert_eq!(form.validate(), Err(FormError::MissingBasicFields));
    }

    #[test]
    fn signup_form_reads_front_end_json() {
        let form: SignupForm = serde_json::from_str(
            r#"{"firstName":"Maria","cardCVV":"123","agreeToTerms":true}"#,
        )
        .unwrap();
        assert_eq!(form.card_cvv, "123");
        assert!(form.agree_to_terms);
        assert_eq!(form.validate(), Err(FormError::MissingBasicFields));
    }

    #[test]
    fn login_needs_both_fields() {
        let form = LoginForm {
            email: "maria@example.com".into(),
            password: String::new(),
        };
        assert_eq!(form.into_request().unwrap_err(), FormError::MissingFields);
    }

    #[test]
    fn search_needs_pickup_location_date_and_time() {
        let mut search = SearchCriteria {
            pickup_location: "Cebu City".into(),
            pickup_date: "2025-03-10".into(),
            ..SearchCriteria::default()
        };
        assert_eq!(search.validate(), Err(FormError::IncompleteSearch));

        search.pickup_time = "09:00".into();
        let query = search.car_query().unwrap();
        assert_eq!(query.pickup_location.as_deref(), Some("Cebu City"));
    }
}
