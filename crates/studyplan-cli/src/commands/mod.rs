pub mod calendar;
pub mod config;
pub mod recommend;
pub mod record;
pub mod subject;
pub mod timer;
