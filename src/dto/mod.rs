pub mod invoices;
pub mod orders;
pub mod statistics;
