mod software_dto;

pub use software_dto::*;
