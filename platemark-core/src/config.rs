pub mod model;
pub mod record;
