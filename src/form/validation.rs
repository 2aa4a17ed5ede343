//! Application form schema.
//!
//! [`validate`] turns raw field text into a normalized [`Application`] or a set
//! of per-field messages.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static GITHUB_PROFILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?github\.com/[a-zA-Z0-9][a-zA-Z0-9_-]*[a-zA-Z0-9]/?$")
        .expect("github pattern is valid")
});

/// Frontend experience bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Experience {
    #[serde(rename = "0~3년")]
    UpToThree,
    #[serde(rename = "4~7년")]
    FourToSeven,
    #[serde(rename = "8년 이상")]
    EightOrMore,
}

impl Experience {
    pub const ALL: [Self; 3] = [Self::UpToThree, Self::FourToSeven, Self::EightOrMore];

    pub const fn label(self) -> &'static str {
        match self {
            Self::UpToThree => "0~3년",
            Self::FourToSeven => "4~7년",
            Self::EightOrMore => "8년 이상",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Experience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.label() == s.trim())
            .ok_or_else(|| format!("Unknown experience bracket: {s}"))
    }
}

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Experience,
    Github,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Experience, Self::Github];

    /// Stable field name used for focus memory.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Experience => "experience",
            Self::Github => "github",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name / nickname",
            Self::Email => "Email",
            Self::Experience => "Frontend experience",
            Self::Github => "GitHub profile (optional)",
        }
    }

    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Github)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Field text exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawApplication {
    pub name: String,
    pub email: String,
    pub experience: String,
    pub github: String,
}

/// A validated, normalized application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub name: String,
    pub email: String,
    pub experience: Experience,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First failing field in display order.
    pub fn first(&self) -> Option<(Field, &str)> {
        self.0.iter().next().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some((_, message)) if self.len() == 1 => write!(f, "The form has 1 error: {message}"),
            Some((_, message)) => write!(
                f,
                "The form has {} errors. First error: {message}",
                self.len()
            ),
            None => f.write_str("The form has no errors"),
        }
    }
}

/// Check and normalize the raw form input.
pub fn validate(raw: &RawApplication) -> Result<Application, FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = raw.name.trim();
    if name.is_empty() {
        errors.insert(Field::Name, "Please enter your name or nickname.");
    }

    let email = raw.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "Please enter your email address.");
    } else if !is_email(email) {
        errors.insert(Field::Email, "Please enter a valid email address.");
    }

    let experience = if raw.experience.trim().is_empty() {
        errors.insert(Field::Experience, "Please select your frontend experience.");
        None
    } else if let Ok(experience) = raw.experience.parse::<Experience>() {
        Some(experience)
    } else {
        errors.insert(Field::Experience, "Please select one of the listed brackets.");
        None
    };

    let github = raw.github.trim();
    if !github.is_empty() && !GITHUB_PROFILE.is_match(github) {
        errors.insert(
            Field::Github,
            "Please enter a valid GitHub link (e.g. https://github.com/username).",
        );
    }

    match experience {
        Some(experience) if errors.is_empty() => Ok(Application {
            name: name.to_string(),
            email: email.to_string(),
            experience,
            github: (!github.is_empty()).then(|| github.to_string()),
        }),
        _ => Err(errors),
    }
}

fn is_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, email: &str, experience: &str, github: &str) -> RawApplication {
        RawApplication {
            name: name.into(),
            email: email.into(),
            experience: experience.into(),
            github: github.into(),
        }
    }

    #[test]
    fn test_valid_application_is_normalized() {
        let application = validate(&raw("  홍길동 ", " a@b.com ", "0~3년", "")).unwrap();
        assert_eq!(application.name, "홍길동");
        assert_eq!(application.email, "a@b.com");
        assert_eq!(application.experience, Experience::UpToThree);
        assert_eq!(application.github, None);
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let errors = validate(&RawApplication::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.get(Field::Name).is_some());
        assert!(errors.get(Field::Email).is_some());
        assert!(errors.get(Field::Experience).is_some());
        assert!(errors.get(Field::Github).is_none());
        assert_eq!(errors.first().map(|(f, _)| f), Some(Field::Name));
        assert!(errors.to_string().starts_with("The form has 3 errors"));
    }

    #[test]
    fn test_whitespace_name_is_rejected() {
        let errors = validate(&raw("   ", "a@b.com", "4~7년", "")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(Field::Name).is_some());
    }

    #[test]
    fn test_email_shapes() {
        for good in ["a@b.com", "first.last+tag@mail.example.co", "x_y@sub-domain.io"] {
            assert!(is_email(good), "{good}");
        }
        for bad in ["plain", "a@b", "@b.com", ".a@b.com", "a..b@c.com", "a@b.c", "a b@c.com"] {
            assert!(!is_email(bad), "{bad}");
        }
    }

    #[test]
    fn test_experience_must_be_listed() {
        let errors = validate(&raw("A", "a@b.com", "10년", "")).unwrap_err();
        assert_eq!(
            errors.get(Field::Experience),
            Some("Please select one of the listed brackets.")
        );
        assert_eq!("8년 이상".parse::<Experience>(), Ok(Experience::EightOrMore));
    }

    #[test]
    fn test_github_profile_pattern() {
        let ok = validate(&raw("A", "a@b.com", "8년 이상", " https://github.com/octo-cat/ ")).unwrap();
        assert_eq!(ok.github.as_deref(), Some("https://github.com/octo-cat/"));
        assert!(validate(&raw("A", "a@b.com", "8년 이상", "http://www.github.com/ab")).is_ok());

        for bad in [
            "https://gitlab.com/user",
            "https://github.com/user/repo",
            "https://github.com/-user",
            "github.com/user",
            "https://github.com/a",
        ] {
            let errors = validate(&raw("A", "a@b.com", "8년 이상", bad)).unwrap_err();
            assert!(errors.get(Field::Github).is_some(), "{bad}");
        }
    }

    #[test]
    fn test_application_serializes_labels() {
        let application = validate(&raw("A", "a@b.com", "0~3년", "")).unwrap();
        let json = serde_json::to_value(&application).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "A", "email": "a@b.com", "experience": "0~3년"})
        );
    }

    #[test]
    fn test_field_names() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert!(!Field::Github.is_required());
    }
}
