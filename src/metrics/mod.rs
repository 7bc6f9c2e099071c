/// Binary classification metrics
pub mod confusion;
