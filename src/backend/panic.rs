use super::{Backend, Unwind};
use crate::frame::FrameId;
use alloc::boxed::Box;
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

pub struct ActiveBackend;

impl Backend for ActiveBackend {
    fn transfer(target: FrameId) -> ! {
        // `resume_unwind` skips the panic hook, so transfers stay silent.
        resume_unwind(Box::new(TryframeMarker(target)));
    }

    fn intercept<Func: FnOnce() -> R, R>(func: Func) -> Result<R, Unwind> {
        catch_unwind(AssertUnwindSafe(func)).map_err(|payload| {
            match payload.downcast::<TryframeMarker>() {
                Ok(marker) => Unwind::Transfer(marker.0),
                Err(payload) => Unwind::Foreign(payload),
            }
        })
    }

    fn resume(unwind: Unwind) -> ! {
        match unwind {
            Unwind::Transfer(target) => Self::transfer(target),
            Unwind::Foreign(payload) => resume_unwind(payload),
        }
    }
}

struct TryframeMarker(FrameId);
