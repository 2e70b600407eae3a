pub mod extract;
pub mod sort;
