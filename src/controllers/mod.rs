pub mod alerts_controller;
pub mod funds_controller;
pub mod home_controller;
pub mod links_controller;
pub mod rules_controller;
