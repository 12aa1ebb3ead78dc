pub mod cache;
pub mod clock;
pub mod mail_transport;
