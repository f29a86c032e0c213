pub mod ip;
pub mod password;
