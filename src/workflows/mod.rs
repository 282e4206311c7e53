pub mod advice;
pub mod decisions;
pub mod financial;
pub mod weighted;
