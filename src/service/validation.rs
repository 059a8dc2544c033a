//! Person validation: field rules plus the email uniqueness read.

use crate::error::{AppError, FieldError};
use crate::model::Person;
use crate::sql::{count_by_email, Tables};
use regex::Regex;
use sqlx::{PgExecutor, Row};
use std::sync::OnceLock;

pub const MINIMUM_AGE: i32 = 18;

pub const MSG_FIRST_NAME: &str = "Enter your FirstName!";
pub const MSG_LAST_NAME: &str = "Enter your LastName!";
pub const MSG_AGE_REQUIRED: &str = "Enter your Age!";
pub const MSG_AGE_MINIMUM: &str = "Your age must be 18 or more to register!";
pub const MSG_EMAIL_REQUIRED: &str = "Enter your Email address!";
pub const MSG_EMAIL_INVALID: &str = "Enter your Valid Email address!";
pub const MSG_EMAIL_TAKEN: &str = "Email address already exists. Try another!";
pub const MSG_COUNTRY: &str = "Enter your Country!";
pub const MSG_CITY: &str = "Enter your City!";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").ok())
        .as_ref()
}

pub fn is_valid_email(s: &str) -> bool {
    email_regex().map(|re| re.is_match(s)).unwrap_or(false)
}

/// Stateless validator. Holds only the table names it reads from, so one
/// instance is shared across concurrent requests.
#[derive(Clone, Debug)]
pub struct PersonValidator {
    tables: Tables,
}

impl PersonValidator {
    pub fn new(tables: Tables) -> Self {
        PersonValidator { tables }
    }

    /// Every rule that needs no storage, in field order. Empty means these rules pass.
    pub fn check_fields(person: &Person) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if person.first_name.trim().is_empty() {
            errors.push(FieldError::new("firstName", MSG_FIRST_NAME));
        }
        if person.last_name.trim().is_empty() {
            errors.push(FieldError::new("lastName", MSG_LAST_NAME));
        }
        if person.age == 0 {
            errors.push(FieldError::new("age", MSG_AGE_REQUIRED));
        }
        if person.age < MINIMUM_AGE {
            errors.push(FieldError::new("age", MSG_AGE_MINIMUM));
        }
        if person.email.trim().is_empty() {
            errors.push(FieldError::new("email", MSG_EMAIL_REQUIRED));
        } else if !is_valid_email(&person.email) {
            errors.push(FieldError::new("email", MSG_EMAIL_INVALID));
        }
        if person.person_address.country.trim().is_empty() {
            errors.push(FieldError::new("personAddress.country", MSG_COUNTRY));
        }
        if person.person_address.city.trim().is_empty() {
            errors.push(FieldError::new("personAddress.city", MSG_CITY));
        }
        errors
    }

    /// Run all rules. The uniqueness read only happens for a syntactically valid
    /// email; `exclude_id` skips the person being updated.
    pub async fn validate<'e, E>(
        &self,
        executor: E,
        person: &Person,
        exclude_id: Option<i32>,
    ) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        let mut errors = Self::check_fields(person);
        let email = person.email.as_str();
        if is_valid_email(email) && !self.email_is_unique(executor, email, exclude_id).await? {
            let at = errors
                .iter()
                .position(|e| e.field.starts_with("personAddress"))
                .unwrap_or(errors.len());
            errors.insert(at, FieldError::new("email", MSG_EMAIL_TAKEN));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }

    async fn email_is_unique<'e, E>(
        &self,
        executor: E,
        email: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let q = count_by_email(&self.tables, email, exclude_id);
        let row = q.query().fetch_one(executor).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;

    fn ann() -> Person {
        Person {
            first_name: "Ann".into(),
            last_name: "Smith".into(),
            age: 30,
            email: "ann@x.com".into(),
            person_address: Address {
                id: 0,
                country: "NL".into(),
                city: "Amsterdam".into(),
            },
            ..Person::default()
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_person_has_no_field_errors() {
        assert!(PersonValidator::check_fields(&ann()).is_empty());
    }

    #[test]
    fn every_field_is_reported_at_once() {
        let errors = PersonValidator::check_fields(&Person::default());
        assert_eq!(
            fields(&errors),
            vec![
                "firstName",
                "lastName",
                "age",
                "age",
                "email",
                "personAddress.country",
                "personAddress.city"
            ]
        );
        assert_eq!(errors[2].message, MSG_AGE_REQUIRED);
        assert_eq!(errors[3].message, MSG_AGE_MINIMUM);
        assert_eq!(errors[4].message, MSG_EMAIL_REQUIRED);
    }

    #[test]
    fn underage_is_rejected_with_age_message() {
        let mut p = ann();
        p.age = 17;
        let errors = PersonValidator::check_fields(&p);
        assert_eq!(errors, vec![FieldError::new("age", MSG_AGE_MINIMUM)]);

        p.age = 18;
        assert!(PersonValidator::check_fields(&p).is_empty());
    }

    #[test]
    fn whitespace_only_text_counts_as_empty() {
        let mut p = ann();
        p.first_name = "   ".into();
        p.person_address.city = "\t".into();
        let errors = PersonValidator::check_fields(&p);
        assert_eq!(fields(&errors), vec!["firstName", "personAddress.city"]);
    }

    #[test]
    fn malformed_email_gets_syntax_message_only() {
        let mut p = ann();
        p.email = "ann.example.com".into();
        let errors = PersonValidator::check_fields(&p);
        assert_eq!(errors, vec![FieldError::new("email", MSG_EMAIL_INVALID)]);
    }

    #[test]
    fn email_with_surrounding_space_is_not_valid_syntax() {
        let mut p = ann();
        p.email = " ann@x.com".into();
        let errors = PersonValidator::check_fields(&p);
        assert_eq!(errors, vec![FieldError::new("email", MSG_EMAIL_INVALID)]);
    }

    #[test]
    fn text_with_surrounding_space_is_accepted() {
        let mut p = ann();
        p.first_name = "Ann ".into();
        p.person_address.city = " Amsterdam".into();
        assert!(PersonValidator::check_fields(&p).is_empty());
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("ann@x"));
        assert!(!is_valid_email("ann@localhost"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("ann@@x.com"));
        assert!(!is_valid_email("ann smith@x.com"));
        assert!(!is_valid_email("ann@x..com"));
    }
}
