pub mod args;
pub mod collect;
pub mod common;
pub mod constants;
pub mod geocode;
pub mod normalize;
pub mod record;
pub mod registry;
pub mod snapshot;
