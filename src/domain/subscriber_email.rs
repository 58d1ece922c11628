/// An email address that passed the shape check.
///
/// Only the syntax is checked: `local@domain.tld`. Deliverability and
/// domain existence are the subscription service's business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailShapeError {
    #[error("empty input")]
    Empty,
    #[error("invalid shape")]
    InvalidShape,
}

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<SubscriberEmail, EmailShapeError> {
        if s.is_empty() {
            return Err(EmailShapeError::Empty);
        }
        if !has_email_shape(&s) {
            return Err(EmailShapeError::InvalidShape);
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// local part and domain: no whitespace, no '@'. At least one '.' in the
// domain must be followed by two or more non-whitespace characters.
fn has_email_shape(s: &str) -> bool {
    let Some((local, rest)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if rest.chars().any(char::is_whitespace) {
        return false;
    }

    rest.char_indices().any(|(i, c)| {
        if c != '.' {
            return false;
        }
        let (domain, tld) = (&rest[..i], &rest[i + 1..]);
        !domain.is_empty() && !domain.contains('@') && tld.chars().count() >= 2
    })
}
