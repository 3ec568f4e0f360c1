pub mod mail;
pub mod orders;
pub mod products;
pub mod tickets;
