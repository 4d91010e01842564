//! NT input records
//!
//! Host key and mouse events become `INPUT` records for the kernel's input
//! injection path. Keys and buttons with no NT equivalent are logged and
//! dropped rather than sent with a zero code.

use bitflags::bitflags;

use crate::host::{button, HostEvent, KeySym};

bitflags! {
    /// `KEYEVENTF_*` flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyEventFlags: u32 {
        const EXTENDEDKEY = 0x0001;
        const KEYUP = 0x0002;
    }
}

bitflags! {
    /// `MOUSEEVENTF_*` flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MouseEventFlags: u32 {
        const MOVE = 0x0001;
        const LEFTDOWN = 0x0002;
        const LEFTUP = 0x0004;
        const RIGHTDOWN = 0x0008;
        const RIGHTUP = 0x0010;
        const MIDDLEDOWN = 0x0020;
        const MIDDLEUP = 0x0040;
    }
}

/// Virtual-key codes
pub mod vk {
    pub const ESCAPE: u16 = 0x1b;
    pub const SPACE: u16 = 0x20;
    pub const LEFT: u16 = 0x25;
    pub const UP: u16 = 0x26;
    pub const RIGHT: u16 = 0x27;
    pub const DOWN: u16 = 0x28;
}

/// `KEYBDINPUT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardInput {
    pub vk: u16,
    pub scan: u16,
    pub flags: KeyEventFlags,
    pub time: u32,
    pub extra_info: usize,
}

/// `MOUSEINPUT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub dx: i32,
    pub dy: i32,
    pub mouse_data: u32,
    pub flags: MouseEventFlags,
    pub time: u32,
    pub extra_info: usize,
}

/// `INPUT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Keyboard(KeyboardInput),
    Mouse(MouseInput),
}

/// Map a host key symbol to a virtual-key code.
///
/// Host symbols for letters are lowercase ASCII; virtual keys for letters
/// are the uppercase characters. Digits coincide.
pub fn keysym_to_vkey(sym: KeySym) -> Option<u16> {
    match sym {
        s if (KeySym::A.0..=KeySym::Z.0).contains(&s.0) => {
            Some((s.0 as u8).to_ascii_uppercase() as u16)
        }
        s if (KeySym::NUM_0.0..=KeySym::NUM_9.0).contains(&s.0) => Some(s.0 as u16),
        KeySym::SPACE => Some(vk::SPACE),
        KeySym::UP => Some(vk::UP),
        KeySym::DOWN => Some(vk::DOWN),
        KeySym::LEFT => Some(vk::LEFT),
        KeySym::RIGHT => Some(vk::RIGHT),
        KeySym::ESCAPE => Some(vk::ESCAPE),
        _ => None,
    }
}

/// Button transition flag for a host mouse button.
pub fn mouse_button_flags(btn: u8, pressed: bool) -> Option<MouseEventFlags> {
    let flags = match (btn, pressed) {
        (button::LEFT, true) => MouseEventFlags::LEFTDOWN,
        (button::LEFT, false) => MouseEventFlags::LEFTUP,
        (button::RIGHT, true) => MouseEventFlags::RIGHTDOWN,
        (button::RIGHT, false) => MouseEventFlags::RIGHTUP,
        (button::MIDDLE, true) => MouseEventFlags::MIDDLEDOWN,
        (button::MIDDLE, false) => MouseEventFlags::MIDDLEUP,
        _ => return None,
    };
    Some(flags)
}

/// Translate a host event into an input record stamped with `time`.
///
/// Returns `None` for events that carry no input: quit, user events,
/// anything the host reports that this layer ignores, and unmapped keys or
/// buttons.
pub fn translate(event: &HostEvent, time: u32) -> Option<Input> {
    match *event {
        HostEvent::Key {
            sym,
            scancode,
            pressed,
        } => {
            let Some(vk) = keysym_to_vkey(sym) else {
                log::warn!("[input] unhandled key symbol {}", sym.0);
                return None;
            };
            let flags = if pressed {
                KeyEventFlags::empty()
            } else {
                KeyEventFlags::KEYUP
            };
            Some(Input::Keyboard(KeyboardInput {
                vk,
                scan: scancode as u16,
                flags,
                time,
                extra_info: 0,
            }))
        }
        HostEvent::MouseButton {
            button,
            pressed,
            x,
            y,
        } => {
            let Some(flags) = mouse_button_flags(button, pressed) else {
                log::warn!("[input] unknown mouse button {}", button);
                return None;
            };
            Some(Input::Mouse(MouseInput {
                dx: x as i32,
                dy: y as i32,
                mouse_data: 0,
                flags,
                time,
                extra_info: 0,
            }))
        }
        HostEvent::MouseMotion { x, y, .. } => Some(Input::Mouse(MouseInput {
            dx: x as i32,
            dy: y as i32,
            mouse_data: 0,
            flags: MouseEventFlags::MOVE,
            time,
            extra_info: 0,
        })),
        HostEvent::Quit | HostEvent::User { .. } | HostEvent::Other(_) => None,
    }
}
