//! Process-wide graphics session for callers that cannot thread a
//! [`Graphics`] handle through their code.

use log::warn;
use spin::Mutex;

use crate::error::{GrError, GrResult};
use crate::graphics::Graphics;
use crate::settings::DisplaySettings;

pub static GRAPHICS: Mutex<Option<Graphics>> = Mutex::new(None);

/// Opens the display into [`GRAPHICS`]. Refused while a session is open.
pub fn init_graphics(settings: DisplaySettings) -> GrResult<()> {
    let mut slot = GRAPHICS.lock();
    if slot.is_some() {
        warn!("graphics already initialized");
        return Err(GrError::Unsupported);
    }
    *slot = Some(Graphics::init(settings)?);
    Ok(())
}

/// Runs `f` on the open session, or returns `None` if there is none.
pub fn with_graphics<T>(f: impl FnOnce(&mut Graphics) -> T) -> Option<T> {
    GRAPHICS.lock().as_mut().map(f)
}

/// Closes the session, restoring the console.
pub fn exit_graphics() {
    GRAPHICS.lock().take();
}
