pub mod dispatch;
pub mod mailings;
pub mod messages;
pub mod recipients;
pub mod statistics;
