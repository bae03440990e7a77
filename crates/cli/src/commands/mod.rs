pub mod chat;
pub mod config_cmd;
pub mod doctor;
pub mod experts;
pub mod onboard;
pub mod status;
