// Library surface for headless/integration tests and reuse.
pub mod app;
pub mod calendar;
pub mod links;
pub mod notes;
pub mod profile;
pub mod runtime;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod todo;
pub mod ui;
pub mod util;
