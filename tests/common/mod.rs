#![allow(dead_code)]

pub mod collaborators;
pub mod synthetic_image;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
