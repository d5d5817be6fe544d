pub mod adobe_auth;
pub mod collection;
pub mod lightroom;
pub mod photo;
pub mod session;
pub mod upload;
