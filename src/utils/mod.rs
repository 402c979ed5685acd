pub mod html;
pub mod request_log;
