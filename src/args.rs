use clap::Parser;
use std::path::PathBuf;

use crate::post::TimeWindow;
use crate::store::DEFAULT_STORE;

#[derive(Parser, Debug)]
#[command(about = "Turn the top r/AmITheAsshole posts into narrated videos")]
pub struct Args {
    /// How many videos to produce in this batch
    #[clap(long, default_value_t = 5)]
    pub count: usize,

    #[clap(long, value_enum, default_value_t = TimeWindow::Week)]
    pub window: TimeWindow,

    /// JSON file holding every post seen so far
    #[clap(long, default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    #[clap(long, default_value = "videos")]
    pub out_dir: PathBuf,

    #[clap(long, default_value = "./res/bg.mp4")]
    pub background: PathBuf,

    #[clap(long, default_value = "./tts/en_US-hfc_male-medium.onnx")]
    pub piper_model: PathBuf,

    #[clap(long, default_value_t = 250)]
    pub chunk_chars: usize,
}
