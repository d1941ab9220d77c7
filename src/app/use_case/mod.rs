pub mod iam;
pub mod product;
