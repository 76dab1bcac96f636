pub mod messaging;
pub mod repositories;
pub mod ticker;
