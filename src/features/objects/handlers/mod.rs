mod object_handler;

pub use object_handler::*;
