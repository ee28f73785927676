//! Persona input validation
//!
//! Length limits mirror the column definitions of the `personas` table,
//! so anything that passes here fits the store.

use std::fmt;

use super::ValidationError;

/// Maximum length of a national ID (`VARCHAR(20)`)
pub const MAX_DNI_LEN: usize = 20;

/// Maximum length of first and last names (`VARCHAR(100)`)
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of an email address (`VARCHAR(255)`)
pub const MAX_EMAIL_LEN: usize = 255;

/// Trim, reject empty, enforce a character limit.
fn bounded(field: &'static str, s: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// National ID, the external lookup key of a persona
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dni(String);

impl Dni {
    /// Validate a national ID.
    ///
    /// # Example
    /// ```
    /// use personas_server::models::Dni;
    ///
    /// assert_eq!(Dni::new(" 30111222 ").unwrap().as_str(), "30111222");
    /// assert!(Dni::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded("dni", s, MAX_DNI_LEN).map(Self)
    }

    /// Use a national ID exactly as received, for lookups only.
    ///
    /// No trimming or length check: a key that could never have been
    /// stored simply matches nothing.
    pub fn lookup_key(s: &str) -> Self {
        Self(s.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Dni {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dni {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First or last name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        bounded(field, s, MAX_NAME_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Optional contact email. Only the length is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Blank input is treated as "no email".
    pub fn optional(s: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match s.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => bounded("email", v, MAX_EMAIL_LEN).map(|v| Some(Self(v))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated input for creating a persona
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPersona {
    pub dni: Dni,
    pub nombre: PersonName,
    pub apellido: PersonName,
    pub email: Option<Email>,
}

impl NewPersona {
    pub fn new(
        dni: &str,
        nombre: &str,
        apellido: &str,
        email: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            dni: Dni::new(dni)?,
            nombre: PersonName::new("nombre", nombre)?,
            apellido: PersonName::new("apellido", apellido)?,
            email: Email::optional(email)?,
        })
    }
}

/// Validated replacement values for an existing persona.
///
/// The national ID is not part of an update; it is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaUpdate {
    pub nombre: PersonName,
    pub apellido: PersonName,
    pub email: Option<Email>,
}

impl PersonaUpdate {
    pub fn new(nombre: &str, apellido: &str, email: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            nombre: PersonName::new("nombre", nombre)?,
            apellido: PersonName::new("apellido", apellido)?,
            email: Email::optional(email)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dni_is_trimmed() {
        assert_eq!(Dni::new("  A-1 ").unwrap().as_str(), "A-1");
    }

    #[test]
    fn dni_rejects_whitespace_only() {
        let err = Dni::new("   ").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "dni" });
    }

    #[test]
    fn lookup_key_is_taken_verbatim() {
        assert_eq!(Dni::lookup_key(" A ").as_str(), " A ");
        assert_eq!(Dni::lookup_key(&"9".repeat(21)).as_str().len(), 21);
    }

    #[test]
    fn dni_max_length() {
        assert!(Dni::new(&"9".repeat(20)).is_ok());
        let err = Dni::new(&"9".repeat(21)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 20, .. }));
    }

    #[test]
    fn names_count_characters_not_bytes() {
        // 100 two-byte characters still fit
        assert!(PersonName::new("nombre", &"ñ".repeat(100)).is_ok());
        assert!(PersonName::new("nombre", &"ñ".repeat(101)).is_err());
    }

    #[test]
    fn empty_name_names_the_field() {
        let err = NewPersona::new("1", "Ana", "", None).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "apellido" });
    }

    #[test]
    fn blank_email_becomes_none() {
        assert_eq!(Email::optional(Some("  ")).unwrap(), None);
        assert_eq!(Email::optional(None).unwrap(), None);
        let email = Email::optional(Some(" ana@example.com ")).unwrap().unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
    }

    #[test]
    fn email_format_is_not_checked() {
        assert!(Email::optional(Some("not an email")).unwrap().is_some());
    }

    #[test]
    fn update_validates_names() {
        assert!(PersonaUpdate::new("Ana", "Gómez", None).is_ok());
        let err = PersonaUpdate::new("", "Gómez", None).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "nombre" });
    }
}
