// dqt-core/src/infrastructure/store/mod.rs

pub mod history;
pub mod memory;
pub mod yaml;

pub use history::JsonHistory;
pub use memory::{InMemoryHistory, InMemoryRepository};
pub use yaml::YamlRepository;
