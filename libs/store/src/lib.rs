pub mod client;
pub mod store;
pub mod utils;
pub mod raw_log {
    pub mod adapter;
    pub mod model;
    pub mod pretty;
}
pub mod purchase {
    pub mod model;
    pub mod pretty;
}
