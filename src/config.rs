use crate::Args;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub max_file_size: usize,
    pub font_path: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            upload_dir: args.upload_dir,
            processed_dir: args.processed_dir,
            max_file_size: args.max_file_size,
            font_path: args.font_path,
        }
    }
}
