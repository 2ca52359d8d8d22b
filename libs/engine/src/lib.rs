pub mod args;
pub mod decoder;
pub mod engine;
pub mod handoff;
pub mod metrics;
pub mod retry;
pub mod scanner;
pub mod state;
pub mod sink {
    pub mod adapter;
    pub mod handle;
    pub mod purchase;
}
pub mod source {
    pub mod filter;
    pub mod handle;
    pub mod log;
}
