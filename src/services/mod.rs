pub mod description;
pub mod playlist_builder;
pub mod reconcile;
pub mod resolve;
pub mod spotify;
pub mod station_page;
pub mod sync;
