mod console;
mod telegram;

pub use console::ConsoleNotifier;
pub use telegram::TelegramNotifier;
