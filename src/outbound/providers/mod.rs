pub mod openai;
pub mod telegram;

pub use openai::OpenAiProvider;
pub use telegram::TelegramNotifier;
