pub mod storage;
pub mod llm;
pub mod voice;
pub mod download;
pub mod attachment;

#[cfg(test)]
mod tests;
