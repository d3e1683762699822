pub mod accrual;
pub mod comparison;
pub mod invoice_date;
pub mod taxation;
pub mod validation;
