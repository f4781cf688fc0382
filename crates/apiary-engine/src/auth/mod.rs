pub mod access;
pub mod subject;
