//! User aggregate.

use crate::domain::foundation::{InstituteId, Role, Timestamp, UserId, ValidationError};

/// Maximum length for first and last names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Minimum length for a plain-text password at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// User account.
///
/// # Invariants
///
/// - `email` is lower-cased and contains exactly one `@` with text on both sides
/// - names are 1-100 characters after trimming
/// - `role` matches the user's role record (enforced by the store)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    institute_id: InstituteId,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    role: Role,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl User {
    /// Creates a new user.
    ///
    /// `password_hash` must already be the output of the password hasher.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the email or a name is malformed
    pub fn new(
        institute_id: InstituteId,
        email: &str,
        first_name: &str,
        last_name: &str,
        password_hash: String,
        role: Role,
    ) -> Result<Self, ValidationError> {
        let email = normalize_email(email)?;
        let first_name = validate_name("first_name", first_name)?;
        let last_name = validate_name("last_name", last_name)?;

        let now = Timestamp::now();
        Ok(Self {
            id: UserId::new(),
            institute_id,
            email,
            first_name,
            last_name,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a user from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        institute_id: InstituteId,
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
        role: Role,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            institute_id,
            email,
            first_name,
            last_name,
            password_hash,
            role,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn institute_id(&self) -> &InstituteId {
        &self.institute_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Copy of this user holding `role`.
    ///
    /// Transition rules are not checked here; callers go through the role
    /// transition planner.
    pub(crate) fn with_role(&self, role: Role) -> Self {
        Self {
            role,
            updated_at: Timestamp::now(),
            ..self.clone()
        }
    }
}

/// Lower-cases and checks the shape of an email address.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(ValidationError::invalid_format("email", "expected local@domain")),
    }
}

fn validate_name(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = value.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_NAME_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> Result<User, ValidationError> {
        User::new(
            InstituteId::new(),
            email,
            "Ada",
            "Lovelace",
            "hash".to_string(),
            Role::Student,
        )
    }

    #[test]
    fn email_is_normalized() {
        let user = user("  Ada@School.TEST ").unwrap();
        assert_eq!(user.email(), "ada@school.test");
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "ada", "@school.test", "ada@", "a@b@c"] {
            assert!(user(email).is_err(), "{} should be rejected", email);
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = User::new(
            InstituteId::new(),
            "a@b.test",
            "  ",
            "Lovelace",
            "hash".to_string(),
            Role::Teacher,
        )
        .unwrap_err();
        assert_eq!(err.field(), "first_name");
    }

    #[test]
    fn overlong_name_is_rejected() {
        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        let result = User::new(
            InstituteId::new(),
            "a@b.test",
            "Ada",
            &long,
            "hash".to_string(),
            Role::Teacher,
        );
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn with_role_keeps_identity() {
        let original = user("ada@school.test").unwrap();
        let promoted = original.with_role(Role::Teacher);
        assert_eq!(promoted.id(), original.id());
        assert_eq!(promoted.email(), original.email());
        assert_eq!(promoted.role(), Role::Teacher);
    }
}
