pub mod approval;
pub mod comment;
pub mod employee;
pub mod permit;
pub mod role;
