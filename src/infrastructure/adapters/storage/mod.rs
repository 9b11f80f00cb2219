//! Storage Adapters

mod file_audio_store;

pub use file_audio_store::FileAudioStore;
