//! Outbound notifications (email).

mod email;

pub use email::Mailer;
