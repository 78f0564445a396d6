use tars_shared::constants::{MAX_MESSAGE_LENGTH, REACTION_EMOJIS, RESPONDER_NAME};
use tars_shared::validation::*;

#[test]
fn known_rooms_are_accepted() {
    assert_eq!(validate_room("General"), Ok("General"));
    assert_eq!(validate_room("Random"), Ok("Random"));
}

#[test]
fn room_names_are_case_sensitive() {
    assert!(validate_room("general").is_err());
    assert!(validate_room("").is_err());
}

#[test]
fn whitespace_only_message_is_rejected() {
    assert!(validate_message_content("").is_err());
    assert!(validate_message_content("   \t\n").is_err());
    assert!(validate_message_content(" hi ").is_ok());
}

#[test]
fn message_length_counts_characters() {
    let at_limit = "🚀".repeat(MAX_MESSAGE_LENGTH);
    assert!(validate_message_content(&at_limit).is_ok());
    let over = "a".repeat(MAX_MESSAGE_LENGTH + 1);
    assert!(validate_message_content(&over).is_err());
}

#[test]
fn only_palette_reactions_are_accepted() {
    for emoji in REACTION_EMOJIS {
        assert!(validate_reaction(emoji).is_ok());
    }
    assert!(validate_reaction("🔥").is_err());
}

#[test]
fn email_and_password_rules() {
    assert!(validate_email("alice@test.com").is_ok());
    assert!(validate_email("alice").is_err());
    assert!(validate_email("@test.com").is_err());
    assert!(validate_email("alice@localhost").is_err());
    assert!(validate_password("short").is_err());
    assert!(validate_password("long enough").is_ok());
}

#[test]
fn first_name_limit() {
    assert!(validate_first_name("Alice").is_ok());
    assert!(validate_first_name(&"x".repeat(33)).is_err());
}

#[test]
fn responder_name_is_reserved() {
    assert!(validate_first_name(RESPONDER_NAME).is_err());
    assert!(validate_first_name(&format!("  {}  ", RESPONDER_NAME)).is_err());
    assert!(validate_first_name("Tars").is_ok());
}
