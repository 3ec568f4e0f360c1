pub mod mail_service;
pub mod order_service;
pub mod ticket_service;
