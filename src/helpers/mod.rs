pub mod calendar;
pub mod drive;
pub mod google;
pub mod sheets;
