pub mod attempt_statuses;
pub mod mailing_statuses;
pub mod roles;
