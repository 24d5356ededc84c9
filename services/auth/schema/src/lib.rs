pub mod otp_codes;
pub mod pending_signups;
pub mod users;
