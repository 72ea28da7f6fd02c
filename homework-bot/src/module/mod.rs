pub mod homework;
pub mod scheduled;
pub mod telegram;
