pub mod locale;
pub mod runtime;
