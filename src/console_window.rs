/// Hides the console window if it was created for this process.
///
/// Consoles inherited from a parent shell stay visible.
#[cfg(windows)]
pub fn hide_owned_console() {
    use windows::Win32::System::Console::GetConsoleWindow;
    use windows::Win32::System::Threading::GetCurrentProcessId;
    use windows::Win32::UI::WindowsAndMessaging::{GetWindowThreadProcessId, ShowWindow, SW_HIDE};
    log::trace!("Ensuring console window hidden if necessary");
    unsafe {
        let console = GetConsoleWindow();
        if console.0 != 0 {
            let mut console_pid = 0;
            GetWindowThreadProcessId(console, Some(&mut console_pid as *mut u32));
            if console_pid == GetCurrentProcessId() {
                ShowWindow(console, SW_HIDE);
            }
        }
    }
}

#[cfg(not(windows))]
pub fn hide_owned_console() {}
