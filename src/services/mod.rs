pub mod invoice_service;
pub mod order_service;
pub mod statistics_service;
