//! X11 viewer window. A normal managed top-level window the user can
//! resize; frames are pushed with `put_image` in strips that fit the
//! server's request size limit.

use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::*;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use log::{debug, warn};

use crate::error::{Error, Result};

/// Bytes of request header ahead of the image data.
const PUT_IMAGE_HEADER: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Resized { width: u32, height: u32 },
    /// Contents were damaged and must be drawn again.
    Exposed,
    /// The window manager asked us to close.
    Closed,
}

pub struct ViewerWindow {
    conn: RustConnection,
    window: Window,
    gc: Gcontext,
    depth: u8,
    wm_delete: Atom,
    width: u32,
    height: u32,
}

impl ViewerWindow {
    pub fn new(width: u16, height: u16, title: &str) -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None).map_err(x11)?;
        let screen = &conn.setup().roots[screen_num];
        let (root, visual, depth) = (screen.root, screen.root_visual, screen.root_depth);

        let window = conn.generate_id().map_err(x11)?;
        let values = CreateWindowAux::new()
            .background_pixel(screen.black_pixel)
            .event_mask(EventMask::EXPOSURE | EventMask::STRUCTURE_NOTIFY);
        conn.create_window(depth, window, root, 0, 0, width, height, 0, WindowClass::INPUT_OUTPUT, visual, &values)
            .map_err(x11)?;

        conn.change_property8(PropMode::REPLACE, window, AtomEnum::WM_NAME, AtomEnum::STRING, title.as_bytes())
            .map_err(x11)?;
        let wm_protocols = intern_atom(&conn, "WM_PROTOCOLS")?;
        let wm_delete = intern_atom(&conn, "WM_DELETE_WINDOW")?;
        conn.change_property32(PropMode::REPLACE, window, wm_protocols, AtomEnum::ATOM, &[wm_delete])
            .map_err(x11)?;

        let gc = conn.generate_id().map_err(x11)?;
        conn.create_gc(gc, window, &CreateGCAux::new()).map_err(x11)?;
        conn.map_window(window).map_err(x11)?;
        conn.flush().map_err(x11)?;

        debug!("Window created: {width}x{height}, depth {depth}");

        Ok(ViewerWindow { conn, window, gc, depth, wm_delete, width: width.into(), height: height.into() })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Push a full frame of premultiplied ARGB pixels, row-major.
    pub fn present(&self, pixels: &[u32], width: u32, height: u32) {
        if width == 0 || height == 0 || pixels.len() < (width * height) as usize {
            warn!("Skipping frame: {} pixels for {width}x{height}", pixels.len());
            return;
        }
        let data = to_bgrx(pixels);
        let stride = width as usize * 4;
        let budget = self.conn.maximum_request_bytes().saturating_sub(PUT_IMAGE_HEADER);
        let rows_per_strip = (budget / stride).clamp(1, height as usize);

        for (strip, chunk) in data.chunks(stride * rows_per_strip).enumerate() {
            let rows = (chunk.len() / stride) as u16;
            let y = (strip * rows_per_strip) as i16;
            if let Err(e) = self.conn.put_image(
                ImageFormat::Z_PIXMAP,
                self.window,
                self.gc,
                width as u16,
                rows,
                0,
                y,
                0,
                self.depth,
                chunk,
            ) {
                warn!("put_image failed: {e}");
                return;
            }
        }
        let _ = self.conn.flush();
    }

    /// Drain pending X11 events without blocking.
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        let mut out = Vec::new();
        while let Ok(Some(event)) = self.conn.poll_for_event() {
            match event {
                Event::Expose(e) if e.count == 0 => out.push(WindowEvent::Exposed),
                Event::ConfigureNotify(e) => {
                    let (w, h) = (u32::from(e.width), u32::from(e.height));
                    if (w, h) != (self.width, self.height) {
                        debug!("Window resized to {w}x{h}");
                        self.width = w;
                        self.height = h;
                        out.push(WindowEvent::Resized { width: w, height: h });
                    }
                }
                Event::ClientMessage(e) if e.data.as_data32()[0] == self.wm_delete => out.push(WindowEvent::Closed),
                _ => {}
            }
        }
        out
    }
}

/// Little-endian ARGB words as the BGRX bytes a 24/32-bit TrueColor
/// visual expects.
fn to_bgrx(pixels: &[u32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(pixels.len() * 4);
    for &px in pixels {
        data.extend_from_slice(&px.to_le_bytes());
    }
    data
}

fn x11(e: impl std::fmt::Display) -> Error {
    Error::X11(e.to_string())
}

fn intern_atom(conn: &RustConnection, name: &str) -> Result<Atom> {
    conn.intern_atom(false, name.as_bytes())
        .map_err(x11)?
        .reply()
        .map(|r| r.atom)
        .map_err(x11)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_becomes_bgrx() {
        assert_eq!(to_bgrx(&[0xFF11_2233, 0x0000_00FF]), vec![0x33, 0x22, 0x11, 0xFF, 0xFF, 0, 0, 0]);
    }
}
