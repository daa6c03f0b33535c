pub mod labels;
pub mod mapper;
pub mod publish;
