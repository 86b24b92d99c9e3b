// Service exports
pub mod explainer;
pub mod generator;
pub mod narration;
pub mod store;

pub use explainer::{Explainer, ExplainerError, Explanation, FruitContext};
pub use generator::{generate_fruit, Communication, GeneratedFruit};
pub use store::{FruitStore, MemoryStore, StoreError};
