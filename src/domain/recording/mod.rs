//! Recording domain module

mod audio_data;
mod fragment;
mod frame;

pub use audio_data::{AudioData, AudioMimeType};
pub use fragment::{AudioFragment, FragmentBuffer};
pub use frame::VideoFrame;
