//! Display names for keyboard keys.
//!
//! Bindings documents name keyboard keys with identifiers such as
//! `Key_LeftShift` or `Key_Numpad_7`.  The keyboard sheet prints them the way
//! they appear on a keycap.

use std::borrow::Cow;

/// Prefix shared by every keyboard key identifier.
pub const KEY_PREFIX: &str = "Key_";

/// Returns the printable name of a key identifier.
///
/// Known identifiers map through a fixed table; anything else has its
/// `Key_` prefix removed, so `Key_A` prints as `A`.
pub fn display_name(key: &str) -> Cow<'_, str> {
    match known_name(key) {
        Some(name) => Cow::Borrowed(name),
        None if key.contains(KEY_PREFIX) => Cow::Owned(key.replace(KEY_PREFIX, "")),
        None => Cow::Borrowed(key),
    }
}

fn known_name(key: &str) -> Option<&'static str> {
    let name = match key {
        // Modifiers
        "Key_LeftShift" => "Left Shift",
        "Key_RightShift" => "Right Shift",
        "Key_LeftControl" => "Left Ctrl",
        "Key_RightControl" => "Right Ctrl",
        "Key_LeftAlt" => "Left Alt",
        "Key_RightAlt" => "Right Alt",
        "Key_LeftWin" => "Left Win",
        "Key_RightWin" => "Right Win",
        "Key_Apps" => "Menu",

        // Editing and whitespace
        "Key_Space" => "Space",
        "Key_Enter" => "Enter",
        "Key_Backspace" => "Backspace",
        "Key_Tab" => "Tab",
        "Key_Escape" => "Esc",
        "Key_CapsLock" => "Caps Lock",
        "Key_Insert" => "Ins",
        "Key_Delete" => "Del",
        "Key_Home" => "Home",
        "Key_End" => "End",
        "Key_PageUp" => "Page Up",
        "Key_PageDown" => "Page Down",

        // Arrows
        "Key_UpArrow" => "Up",
        "Key_DownArrow" => "Down",
        "Key_LeftArrow" => "Left",
        "Key_RightArrow" => "Right",

        // Punctuation
        "Key_Minus" => "-",
        "Key_Equals" => "=",
        "Key_LeftBracket" => "[",
        "Key_RightBracket" => "]",
        "Key_SemiColon" => ";",
        "Key_Apostrophe" => "'",
        "Key_Grave" => "`",
        "Key_BackSlash" => "\\",
        "Key_Comma" => ",",
        "Key_Period" => ".",
        "Key_Slash" => "/",
        "Key_Hash" => "#",

        // Numeric keypad
        "Key_Numpad_0" => "Num 0",
        "Key_Numpad_1" => "Num 1",
        "Key_Numpad_2" => "Num 2",
        "Key_Numpad_3" => "Num 3",
        "Key_Numpad_4" => "Num 4",
        "Key_Numpad_5" => "Num 5",
        "Key_Numpad_6" => "Num 6",
        "Key_Numpad_7" => "Num 7",
        "Key_Numpad_8" => "Num 8",
        "Key_Numpad_9" => "Num 9",
        "Key_Numpad_Add" => "Num +",
        "Key_Numpad_Subtract" => "Num -",
        "Key_Numpad_Multiply" => "Num *",
        "Key_Numpad_Divide" => "Num /",
        "Key_Numpad_Decimal" => "Num .",
        "Key_NumpadEnter" => "Num Enter",
        "Key_NumLock" => "Num Lock",

        // System
        "Key_ScrollLock" => "Scroll Lock",
        "Key_Pause" => "Pause",
        "Key_SYSRQ" => "Print Screen",
        _ => return None,
    };
    Some(name)
}
