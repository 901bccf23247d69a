// src/services/registration.rs
// DOCUMENTATION: Multi-step sign-up questionnaire
// PURPOSE: Validate each wizard step and turn a completed form into a new account

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use crate::db::{Storage, UserStore};
use crate::errors::AppError;
use crate::models::TravelPreferences;

pub const TRAVEL_STYLES: [&str; 5] = [
    "adventure",
    "relaxation",
    "cultural",
    "gastronomic",
    "ecotourism",
];
pub const GROUP_TYPES: [&str; 4] = ["solo", "couple", "family", "friends"];
pub const INTERESTS: [&str; 9] = [
    "diving",
    "snorkeling",
    "hiking",
    "beaches",
    "boat_tours",
    "surfing",
    "photography",
    "gastronomy",
    "wildlife",
];
pub const BUDGET_RANGES: [&str; 4] = ["economy", "moderate", "premium", "luxury"];
pub const TRIP_DURATIONS: [&str; 4] = ["weekend", "short_stay", "one_week", "two_weeks_plus"];

pub const MAX_INTERESTS: usize = 6;

/// Wizard steps in the order the client walks them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupStep {
    Account = 1,
    TravelStyle = 2,
    Interests = 3,
    Planning = 4,
}

impl SignupStep {
    pub const ALL: [SignupStep; 4] = [
        SignupStep::Account,
        SignupStep::TravelStyle,
        SignupStep::Interests,
        SignupStep::Planning,
    ];

    pub fn from_number(step: u8) -> Result<Self, AppError> {
        SignupStep::ALL
            .into_iter()
            .find(|s| s.number() == step)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown registration step {}", step)))
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn next(&self) -> Option<SignupStep> {
        SignupStep::from_number(self.number() + 1).ok()
    }
}

/// Sign-up form; every field defaults so a single step can be posted alone
/// DOCUMENTATION: Derive rules cover the account step only
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupForm {
    #[validate(length(min = 2, max = 120, message = "full name must have 2 to 120 characters"))]
    pub full_name: String,

    #[validate(email(message = "email is not valid"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "password must have at least 8 characters"))]
    pub password: String,

    pub confirm_password: String,

    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,

    pub travel_style: String,
    pub group_type: String,
    pub interests: Vec<String>,
    pub budget_range: String,
    pub trip_duration: String,
    pub accept_terms: bool,
}

impl SignupForm {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    pub fn preferences(&self) -> TravelPreferences {
        TravelPreferences {
            travel_style: Some(self.travel_style.clone()),
            group_type: Some(self.group_type.clone()),
            interests: self.interests.clone(),
            budget_range: Some(self.budget_range.clone()),
            trip_duration: Some(self.trip_duration.clone()),
        }
    }
}

/// Response body for POST /api/auth/register/steps/{step}
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub step: u8,
    pub valid: bool,
    pub next_step: Option<u8>,
}

fn step_error(step: SignupStep, message: impl Into<String>) -> AppError {
    AppError::RegistrationStep {
        step: step.number(),
        message: message.into(),
    }
}

fn one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be one of: {}", field, allowed.join(", ")))
    }
}

/// Interests must be known and distinct, at most MAX_INTERESTS of them
fn check_interests(interests: &[String], min: usize) -> Result<(), String> {
    if interests.len() < min || interests.len() > MAX_INTERESTS {
        return Err(format!("choose between {} and {} interests", min, MAX_INTERESTS));
    }
    let mut seen = HashSet::new();
    for interest in interests {
        one_of("interests", interest, &INTERESTS)?;
        if !seen.insert(interest.as_str()) {
            return Err(format!("interest '{}' is repeated", interest));
        }
    }
    Ok(())
}

/// Rules of one step that need no storage access
pub fn check_step_fields(step: SignupStep, form: &SignupForm) -> Result<(), AppError> {
    let in_step = |message: String| step_error(step, message);
    match step {
        SignupStep::Account => {
            form.validate()
                .map_err(|errors| step_error(step, errors.to_string()))?;
            if form.password != form.confirm_password {
                return Err(step_error(step, "passwords do not match"));
            }
            Ok(())
        }
        SignupStep::TravelStyle => {
            one_of("travelStyle", &form.travel_style, &TRAVEL_STYLES).map_err(in_step)?;
            one_of("groupType", &form.group_type, &GROUP_TYPES).map_err(in_step)
        }
        SignupStep::Interests => check_interests(&form.interests, 1).map_err(in_step),
        SignupStep::Planning => {
            one_of("budgetRange", &form.budget_range, &BUDGET_RANGES).map_err(in_step)?;
            one_of("tripDuration", &form.trip_duration, &TRIP_DURATIONS).map_err(in_step)?;
            if !form.accept_terms {
                return Err(step_error(step, "the terms of use must be accepted"));
            }
            Ok(())
        }
    }
}

/// Apply the questionnaire's value rules to preferences edited from the profile
/// Absent answers and an empty interest list are allowed
pub fn check_preferences(prefs: &TravelPreferences) -> Result<(), AppError> {
    let answers = [
        ("travelStyle", &prefs.travel_style, &TRAVEL_STYLES[..]),
        ("groupType", &prefs.group_type, &GROUP_TYPES[..]),
        ("budgetRange", &prefs.budget_range, &BUDGET_RANGES[..]),
        ("tripDuration", &prefs.trip_duration, &TRIP_DURATIONS[..]),
    ];
    for (field, value, allowed) in answers {
        if let Some(value) = value {
            one_of(field, value, allowed).map_err(AppError::ValidationError)?;
        }
    }
    check_interests(&prefs.interests, 0).map_err(AppError::ValidationError)
}

/// Validate one step, including the email availability check of step 1
pub async fn check_step(
    storage: &dyn Storage,
    step: SignupStep,
    form: &SignupForm,
) -> Result<StepResult, AppError> {
    check_step_fields(step, form)?;

    if step == SignupStep::Account
        && storage
            .find_user_by_email(&form.normalized_email())
            .await?
            .is_some()
    {
        return Err(step_error(step, "email is already registered"));
    }

    Ok(StepResult {
        step: step.number(),
        valid: true,
        next_step: step.next().map(|s| s.number()),
    })
}

/// Validate every step in order, stopping at the first failure
pub async fn check_all_steps(storage: &dyn Storage, form: &SignupForm) -> Result<(), AppError> {
    for step in SignupStep::ALL {
        check_step(storage, step, form).await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn complete_form(email: &str) -> SignupForm {
    SignupForm {
        full_name: "Marina Costa".to_string(),
        email: email.to_string(),
        password: "noronha2024".to_string(),
        confirm_password: "noronha2024".to_string(),
        phone: None,
        travel_style: "adventure".to_string(),
        group_type: "couple".to_string(),
        interests: vec!["diving".to_string(), "beaches".to_string()],
        budget_range: "premium".to_string(),
        trip_duration: "one_week".to_string(),
        accept_terms: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemStorage, UserStore};
    use crate::models::{NewUser, Role};
    use tokio_test::{assert_err, assert_ok};

    fn failing_step(result: Result<(), AppError>) -> u8 {
        match result {
            Err(AppError::RegistrationStep { step, .. }) => step,
            other => panic!("expected a step error, got {:?}", other),
        }
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(assert_ok!(SignupStep::from_number(3)), SignupStep::Interests);
        assert!(matches!(
            SignupStep::from_number(5),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(SignupStep::Planning.next(), None);
        assert_eq!(SignupStep::Account.next(), Some(SignupStep::TravelStyle));
    }

    #[test]
    fn test_account_step_rules() {
        let mut form = complete_form("marina@example.com");
        assert_ok!(check_step_fields(SignupStep::Account, &form));

        form.confirm_password = "different1".to_string();
        assert_eq!(failing_step(check_step_fields(SignupStep::Account, &form)), 1);

        let form = SignupForm {
            email: "not-an-email".to_string(),
            ..complete_form("x@example.com")
        };
        assert_err!(check_step_fields(SignupStep::Account, &form));

        let form = SignupForm {
            password: "short".to_string(),
            confirm_password: "short".to_string(),
            ..complete_form("x@example.com")
        };
        assert_err!(check_step_fields(SignupStep::Account, &form));
    }

    #[test]
    fn test_travel_style_step_requires_known_options() {
        let form = SignupForm {
            travel_style: "party".to_string(),
            ..complete_form("x@example.com")
        };
        assert_eq!(
            failing_step(check_step_fields(SignupStep::TravelStyle, &form)),
            2
        );
    }

    #[test]
    fn test_interests_step_bounds_and_duplicates() {
        let mut form = complete_form("x@example.com");
        form.interests.clear();
        assert_eq!(failing_step(check_step_fields(SignupStep::Interests, &form)), 3);

        form.interests = INTERESTS.iter().take(7).map(|s| s.to_string()).collect();
        assert_err!(check_step_fields(SignupStep::Interests, &form));

        form.interests = vec!["diving".to_string(), "diving".to_string()];
        assert_err!(check_step_fields(SignupStep::Interests, &form));

        form.interests = vec!["skydiving".to_string()];
        assert_err!(check_step_fields(SignupStep::Interests, &form));

        form.interests = INTERESTS.iter().take(6).map(|s| s.to_string()).collect();
        assert_ok!(check_step_fields(SignupStep::Interests, &form));
    }

    #[test]
    fn test_planning_step_requires_terms() {
        let form = SignupForm {
            accept_terms: false,
            ..complete_form("x@example.com")
        };
        assert_eq!(failing_step(check_step_fields(SignupStep::Planning, &form)), 4);
    }

    #[test]
    fn test_profile_preferences_follow_questionnaire_values() {
        assert_ok!(check_preferences(&TravelPreferences::default()));
        assert_ok!(check_preferences(&complete_form("x@example.com").preferences()));

        let unknown_style = TravelPreferences {
            travel_style: Some("party".to_string()),
            ..TravelPreferences::default()
        };
        assert!(matches!(
            check_preferences(&unknown_style),
            Err(AppError::ValidationError(_))
        ));

        let repeated = TravelPreferences {
            interests: vec!["surfing".to_string(), "surfing".to_string()],
            ..TravelPreferences::default()
        };
        assert_err!(check_preferences(&repeated));

        let too_many = TravelPreferences {
            interests: INTERESTS.iter().map(|s| s.to_string()).collect(),
            ..TravelPreferences::default()
        };
        assert_err!(check_preferences(&too_many));

        let bad_budget = TravelPreferences {
            budget_range: Some("free".to_string()),
            ..TravelPreferences::default()
        };
        assert_err!(check_preferences(&bad_budget));
    }

    #[tokio::test]
    async fn test_account_step_rejects_registered_email() {
        let storage = MemStorage::new();
        assert_ok!(
            storage
                .create_user(NewUser {
                    email: "marina@example.com".to_string(),
                    password_hash: "hash".to_string(),
                    full_name: "Marina".to_string(),
                    phone: None,
                    role: Role::User,
                    preferences: TravelPreferences::default(),
                })
                .await
        );

        let form = complete_form("Marina@Example.com");
        let err = assert_err!(check_step(&storage, SignupStep::Account, &form).await);
        assert!(matches!(err, AppError::RegistrationStep { step: 1, .. }));

        let result = assert_ok!(check_step(&storage, SignupStep::TravelStyle, &form).await);
        assert_eq!(result.next_step, Some(3));
    }

    #[tokio::test]
    async fn test_all_steps_stop_at_first_failure() {
        let storage = MemStorage::new();
        let form = SignupForm {
            group_type: "crowd".to_string(),
            accept_terms: false,
            ..complete_form("new@example.com")
        };
        let err = assert_err!(check_all_steps(&storage, &form).await);
        assert!(matches!(err, AppError::RegistrationStep { step: 2, .. }));

        assert_ok!(check_all_steps(&storage, &complete_form("new@example.com")).await);
    }

    #[test]
    fn test_partial_step_body_deserializes() {
        let form: SignupForm =
            serde_json::from_str(r#"{"travelStyle":"cultural","groupType":"family"}"#).unwrap();
        assert_ok!(check_step_fields(SignupStep::TravelStyle, &form));
        assert!(form.interests.is_empty());
    }
}
