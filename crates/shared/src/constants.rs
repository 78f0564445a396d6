pub const APP_NAME: &str = "Tars Chat";

// Rooms
pub const ROOMS: [&str; 2] = ["General", "Random"];
pub const DEFAULT_ROOM: &str = "General";

// Scripted responder
pub const RESPONDER_NAME: &str = "Tars AI 🤖";
pub const RESPONDER_REPLIES: [&str; 5] = [
    "Interesting 🤔",
    "Tell me more!",
    "Nice point 👍",
    "That sounds great 🚀",
    "Explain further?",
];
pub const DEFAULT_RESPONDER_DELAY_MS: u64 = 1_500;

// Sender shown when the signed-in user has no first name
pub const FALLBACK_SENDER: &str = "You";

pub const REACTION_EMOJIS: [&str; 4] = ["👍", "❤️", "😂", "😮"];

// Limits
pub const MAX_MESSAGE_LENGTH: usize = 4000;
pub const MAX_FIRST_NAME_LENGTH: usize = 32;
pub const MIN_PASSWORD_LENGTH: usize = 8;
