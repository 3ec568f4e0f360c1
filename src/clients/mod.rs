pub mod mail;
pub mod payments;
