//! Language-model plumbing: the text-generation capability, the XML reply
//! parser and the prompts that pull structured parameters out of a message.

pub mod extract;
pub mod model;
pub mod xml;

pub use model::{ModelType, OpenAiModel, TextModel};
pub use xml::parse_key_value_xml;
