//! Input checks applied before anything is sent to the service.

use crate::error::CliError;

const MIN_CONTACT_NAME: usize = 3;
const MIN_PASSWORD: usize = 6;

fn invalid(field: &str, reason: impl Into<String>) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Contact names are trimmed and need at least three characters.
pub fn contact_name(name: &str) -> Result<String, CliError> {
    let name = name.trim();
    if name.chars().count() < MIN_CONTACT_NAME {
        return Err(invalid(
            "name",
            format!("must be at least {MIN_CONTACT_NAME} characters"),
        ));
    }
    Ok(name.to_owned())
}

/// Numbers use the `ddd-ddd-dddd` layout.
pub fn contact_number(number: &str) -> Result<String, CliError> {
    let number = number.trim();
    let groups: Vec<&str> = number.split('-').collect();
    let well_formed = groups.len() == 3
        && groups
            .iter()
            .zip([3, 3, 4])
            .all(|(group, len)| group.len() == len && group.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(invalid("number", "expected format ddd-ddd-dddd"));
    }
    Ok(number.to_owned())
}

pub fn user_name(name: &str) -> Result<String, CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("name", "cannot be empty"));
    }
    Ok(name.to_owned())
}

/// One `@`, a non-empty local part, and a dotted domain.
pub fn email(email: &str) -> Result<String, CliError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(invalid("email", format!("'{email}' is not a valid address")));
    }
    Ok(email.to_owned())
}

pub fn password(password: &str) -> Result<(), CliError> {
    if password.chars().count() < MIN_PASSWORD {
        return Err(invalid(
            "password",
            format!("must be at least {MIN_PASSWORD} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_names_are_trimmed_and_checked() {
        assert_eq!(contact_name("  Eden ").ok().as_deref(), Some("Eden"));
        assert!(contact_name(" Al ").is_err());
    }

    #[test]
    fn numbers_follow_the_dashed_layout() {
        assert!(contact_number("459-12-56").is_err());
        assert!(contact_number("459-123-567").is_err());
        assert!(contact_number("459-123-56a7").is_err());
        assert!(contact_number("4591235678").is_err());
        assert_eq!(
            contact_number("459-123-5678").ok().as_deref(),
            Some("459-123-5678")
        );
    }

    #[test]
    fn emails_need_a_dotted_domain() {
        assert!(email("a@b.com").is_ok());
        assert!(email("first.last@mail.example.org").is_ok());
        for bad in ["", "ab.com", "@b.com", "a@b", "a@.com", "a@b.", "a@b@c.com"] {
            assert!(email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn passwords_have_a_minimum_length() {
        assert!(password("12345").is_err());
        assert!(password("secret1").is_ok());
    }

    #[test]
    fn user_names_must_not_be_blank() {
        assert!(user_name("   ").is_err());
        assert_eq!(user_name(" Rosie ").ok().as_deref(), Some("Rosie"));
    }
}
