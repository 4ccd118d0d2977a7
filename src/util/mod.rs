pub mod figment;
pub mod sensitive;
pub mod validator;

pub use sensitive::Sensitive;
