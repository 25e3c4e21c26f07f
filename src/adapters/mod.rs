pub mod clock;
pub mod http;
pub mod prompt;
pub mod source;
