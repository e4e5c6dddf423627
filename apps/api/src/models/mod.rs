pub mod activity;
pub mod profile;
