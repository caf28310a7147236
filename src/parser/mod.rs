pub mod detail;
pub mod index;
pub mod record;
