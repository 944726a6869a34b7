pub mod auth;
pub mod footprints;
pub mod health;
pub mod otp;
pub mod profile;
pub mod realtime;
pub mod users;
