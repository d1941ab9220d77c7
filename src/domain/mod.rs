pub mod datatype;
pub mod entity;
pub mod repository;
pub mod service;
pub mod validation;
