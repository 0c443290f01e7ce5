pub mod intake;
pub mod pendencies;
