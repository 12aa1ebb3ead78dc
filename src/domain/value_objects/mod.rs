pub mod enums;
pub mod iam;
pub mod mailings;
pub mod messages;
pub mod recipients;
pub mod stats;
