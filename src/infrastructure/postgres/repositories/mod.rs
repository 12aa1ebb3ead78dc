pub mod mailing_attempts;
pub mod mailings;
pub mod messages;
pub mod recipients;
