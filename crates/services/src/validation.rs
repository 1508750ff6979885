//! Input rules applied before anything touches persistence.

use domains::{ThreadDraft, ValidationError};

pub const MAX_TAGS: usize = 3;
pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_BODY_CHARS: usize = 3000;
pub const MAX_USERNAME_CHARS: usize = 30;
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Trims every tag, drops empties and repeats. First occurrence wins the position.
pub fn normalize_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

pub fn validate_thread<S: AsRef<str>>(
    title: &str,
    body: &str,
    tags: &[S],
) -> Result<ThreadDraft, ValidationError> {
    let tags = normalize_tags(tags);
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::TooManyTags {
            max: MAX_TAGS,
            got: tags.len(),
        });
    }

    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong {
            max: MAX_TITLE_CHARS,
        });
    }

    let body = validate_body(body)?;

    Ok(ThreadDraft {
        title: title.to_string(),
        body,
        tags,
    })
}

/// Shared by thread bodies and comment bodies.
pub fn validate_body(body: &str) -> Result<String, ValidationError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(ValidationError::BodyTooLong {
            max: MAX_BODY_CHARS,
        });
    }
    Ok(body.to_string())
}

pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    let len = username.chars().count();
    if len == 0 || len > MAX_USERNAME_CHARS || username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidUsername {
            max: MAX_USERNAME_CHARS,
        });
    }
    Ok(username.to_string())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_CHARS,
        });
    }
    Ok(())
}
