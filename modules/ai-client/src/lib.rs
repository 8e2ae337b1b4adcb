pub mod error;
pub mod gemini;
pub mod openai;
pub mod traits;
pub mod util;

pub use error::AiError;
pub use gemini::Gemini;
pub use openai::OpenAi;
pub use traits::{ChatAgent, EmbedAgent};
pub use util::{strip_code_blocks, strip_wrapping_quotes};
