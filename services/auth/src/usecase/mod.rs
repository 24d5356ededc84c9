pub mod hashing;
pub mod login;
pub mod otp;
pub mod request_otp;
pub mod resend_otp;
pub mod verify_otp;
