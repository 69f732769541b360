// modbridge_support - Shared runtime support for the conversion pipeline
pub mod cancel;

pub use cancel::CancelToken;
