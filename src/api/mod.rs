pub mod certification;
pub mod comment;
pub mod employee;
pub mod medical_leave;
pub mod permit;
pub mod stats;
