mod object_dto;

pub use object_dto::*;
