//! Confirmation and notification dialogs

use console::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

pub trait Prompt {
    /// Blocks until the user answers. Anything but an explicit yes is [Confirmation::Declined].
    fn confirm(&mut self, title: &str, message: &str) -> Confirmation;

    fn notify(&mut self, title: &str, message: &str);
}

/// Always gives the same answer without asking
#[derive(Debug)]
pub struct Preset {
    answer: Confirmation,
    pub notifications: Vec<String>,
}

impl Preset {
    pub fn new(answer: Confirmation) -> Self {
        Self {
            answer,
            notifications: Vec::new(),
        }
    }
}

impl Prompt for Preset {
    fn confirm(&mut self, _title: &str, message: &str) -> Confirmation {
        log::info!("{} {:?}", message, self.answer);
        self.answer
    }

    fn notify(&mut self, _title: &str, message: &str) {
        log::info!("{}", message);
        self.notifications.push(message.to_owned());
    }
}

/// Asks on the terminal
pub struct ConsolePrompt {
    term: Term,
}

impl Default for ConsolePrompt {
    fn default() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Prompt for ConsolePrompt {
    fn confirm(&mut self, title: &str, message: &str) -> Confirmation {
        if self
            .term
            .write_str(&format!("{}\n{} [y/N] ", title, message))
            .is_err()
        {
            return Confirmation::Declined;
        }
        match self.term.read_line() {
            Ok(line) => parse_answer(&line),
            Err(e) => {
                log::warn!("Unable to read answer: {}", e);
                Confirmation::Declined
            }
        }
    }

    fn notify(&mut self, title: &str, message: &str) {
        if let Err(e) = self.term.write_line(&format!("{}\n{}", title, message)) {
            log::warn!("Unable to write to terminal: {}", e);
        }
    }
}

fn parse_answer(line: &str) -> Confirmation {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Confirmation::Confirmed,
        _ => Confirmation::Declined,
    }
}

#[cfg(windows)]
pub use self::message_box::MessageBoxPrompt;

#[cfg(windows)]
mod message_box {
    use super::{Confirmation, Prompt};
    use windows::core::HSTRING;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        MessageBoxW, IDYES, MB_ICONINFORMATION, MB_ICONQUESTION, MB_OK, MB_YESNO,
    };

    /// Native modal message boxes
    #[derive(Debug, Default)]
    pub struct MessageBoxPrompt;

    impl Prompt for MessageBoxPrompt {
        fn confirm(&mut self, title: &str, message: &str) -> Confirmation {
            let result = unsafe {
                MessageBoxW(
                    HWND::default(),
                    &HSTRING::from(message),
                    &HSTRING::from(title),
                    MB_YESNO | MB_ICONQUESTION,
                )
            };
            if result == IDYES {
                Confirmation::Confirmed
            } else {
                Confirmation::Declined
            }
        }

        fn notify(&mut self, title: &str, message: &str) {
            unsafe {
                MessageBoxW(
                    HWND::default(),
                    &HSTRING::from(message),
                    &HSTRING::from(title),
                    MB_OK | MB_ICONINFORMATION,
                )
            };
        }
    }
}
