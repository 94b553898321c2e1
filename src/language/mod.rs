pub mod core;
pub mod difficulty;
pub mod selector;

// Re-export the main types for convenience
pub use core::{Language, WordBank};
pub use difficulty::Difficulty;
pub use selector::{BudgetSelector, RandomSelector, WordSelector};
