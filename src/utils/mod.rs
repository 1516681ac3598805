pub mod logging;
pub mod sanitize;
pub mod url;
