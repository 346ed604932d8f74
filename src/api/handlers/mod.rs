pub mod admin;
pub mod condolences;
pub mod donations;
pub mod funerals;
pub mod root;
pub mod types;
