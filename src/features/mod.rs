pub mod organizations;
pub mod reports;
