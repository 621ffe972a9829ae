pub mod feed;
pub mod listing;
pub mod rules;
pub mod text;
