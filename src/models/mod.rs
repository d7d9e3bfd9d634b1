pub mod calendar;
pub mod docs;
pub mod drive;
pub mod sheets;
