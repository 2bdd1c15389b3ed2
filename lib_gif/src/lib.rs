pub mod constants;
pub mod container;
pub mod declaration;
pub mod overlay;
pub mod quantize;
pub mod remap;

use log::*;

pub use crate::container::format::Gif;
pub use crate::container::{decode, encode};

pub fn init_logging() {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter(Some("lib_gif"), LevelFilter::Debug)
        .filter(Some("emoji_cli"), LevelFilter::Debug)
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
