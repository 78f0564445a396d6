use crate::constants::*;

/// Returns the canonical room name when `name` is one of the fixed rooms.
pub fn validate_room(name: &str) -> Result<&'static str, String> {
    ROOMS
        .iter()
        .copied()
        .find(|r| *r == name)
        .ok_or_else(|| format!("Unknown room: {}", name))
}

pub fn validate_message_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Message content is required".into());
    }
    if content.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(format!(
            "Message must be at most {} characters",
            MAX_MESSAGE_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_reaction(emoji: &str) -> Result<(), String> {
    if REACTION_EMOJIS.contains(&emoji) {
        Ok(())
    } else {
        Err(format!("Unsupported reaction: {}", emoji))
    }
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err("A valid email is required".into());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err("A valid email is required".into());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_first_name(name: &str) -> Result<(), String> {
    // Ownership checks compare display names, so this one is reserved
    if name.trim() == RESPONDER_NAME {
        return Err("That name is reserved".into());
    }
    if name.trim().chars().count() > MAX_FIRST_NAME_LENGTH {
        return Err(format!(
            "First name must be at most {} characters",
            MAX_FIRST_NAME_LENGTH
        ));
    }
    Ok(())
}
