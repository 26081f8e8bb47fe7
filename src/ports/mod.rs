pub mod spotify;
pub mod station_page;
